//! Per-connection subscription manager.
//!
//! Tracks which day-keys a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::HashSet;

use crate::domain::DayKey;

/// Manages the set of day subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed day-keys. If `subscribe_all` is true, this set is ignored.
    days: HashSet<DayKey>,
    /// Whether the client subscribes to all days (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds day-keys to the subscription set. `"*"` enables the wildcard.
    pub fn subscribe(&mut self, days: &[DayKey], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        for day in days {
            self.days.insert(*day);
        }
    }

    /// Removes day-keys from the subscription set.
    pub fn unsubscribe(&mut self, days: &[DayKey]) {
        for day in days {
            self.days.remove(day);
        }
    }

    /// Returns `true` if an event for the given day-key passes the filter.
    /// Events without a day-key (clock ticks) reach every subscriber.
    #[must_use]
    pub fn matches(&self, day: Option<DayKey>) -> bool {
        let Some(day) = day else {
            return true;
        };
        self.subscribe_all || self.days.contains(&day)
    }

    /// Returns the number of explicitly subscribed day-keys.
    #[must_use]
    pub fn count(&self) -> usize {
        self.days.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> DayKey {
        let Some(date) = NaiveDate::from_ymd_opt(2025, 3, d) else {
            panic!("valid date");
        };
        DayKey::new(date)
    }

    #[test]
    fn empty_matches_no_day() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(Some(day(14))));
    }

    #[test]
    fn subscribe_specific_day() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[day(14)], false);
        assert!(mgr.matches(Some(day(14))));
        assert!(!mgr.matches(Some(day(15))));
    }

    #[test]
    fn wildcard_matches_everything() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[], true);
        assert!(mgr.matches(Some(day(14))));
        assert!(mgr.matches(Some(day(15))));
    }

    #[test]
    fn keyless_events_always_match() {
        let mgr = SubscriptionManager::new();
        assert!(mgr.matches(None));
    }

    #[test]
    fn unsubscribe_removes_day() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[day(14)], false);
        assert!(mgr.matches(Some(day(14))));
        mgr.unsubscribe(&[day(14)]);
        assert!(!mgr.matches(Some(day(14))));
    }

    #[test]
    fn count_tracks_explicit() {
        let mut mgr = SubscriptionManager::new();
        assert_eq!(mgr.count(), 0);
        mgr.subscribe(&[day(14), day(15)], false);
        assert_eq!(mgr.count(), 2);
    }
}
