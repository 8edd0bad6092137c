//! Type-safe day identifier.
//!
//! [`DayKey`] wraps a [`chrono::NaiveDate`] and renders as canonical
//! `"YYYY-MM-DD"`. It is the sole identity of a daily availability record:
//! the registry key, the event discriminator, and (prefixed) the storage
//! key.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Prefix used to build storage keys from day-keys.
pub const STORE_KEY_PREFIX: &str = "aircraft-availability-";

/// Canonical `YYYY-MM-DD` identifier for one day's availability record.
///
/// Two day-keys never share snapshots; a record is exclusively owned by
/// its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Creates a `DayKey` from a calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the underlying calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the persistence key, `"aircraft-availability-YYYY-MM-DD"`.
    #[must_use]
    pub fn store_key(&self) -> String {
        format!("{STORE_KEY_PREFIX}{self}")
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // NaiveDate's Display is exactly YYYY-MM-DD.
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<DayKey> for NaiveDate {
    fn from(key: DayKey) -> Self {
        key.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn key() -> DayKey {
        let Some(date) = NaiveDate::from_ymd_opt(2025, 3, 14) else {
            panic!("valid date");
        };
        DayKey::new(date)
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(key().to_string(), "2025-03-14");
    }

    #[test]
    fn store_key_is_prefixed() {
        assert_eq!(key().store_key(), "aircraft-availability-2025-03-14");
    }

    #[test]
    fn parses_from_canonical_form() {
        let parsed: Result<DayKey, _> = "2025-03-14".parse();
        assert_eq!(parsed.ok(), Some(key()));
        assert!("14/03/2025".parse::<DayKey>().is_err());
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&key()).ok();
        assert_eq!(json.as_deref(), Some("\"2025-03-14\""));
        let Some(json) = json else {
            panic!("serialization failed");
        };
        let back: Result<DayKey, _> = serde_json::from_str(&json);
        assert_eq!(back.ok(), Some(key()));
    }

    #[test]
    fn hash_works_in_hashmap() {
        use std::collections::HashMap;
        let k = key();
        let mut map = HashMap::new();
        map.insert(k, "test");
        assert_eq!(map.get(&k), Some(&"test"));
    }
}
