//! Clock-time parsing and day-key formatting.
//!
//! The dashboard exchanges times of day as `"HH:MM"` strings (and accepts
//! the legacy zero-padded `"HHMM"` form), while the aggregator works in
//! decimal hours. [`ClockTime`] is the typed bridge between the two.
//! Parsing returns an explicit error instead of a `0` sentinel, so
//! midnight is never conflated with malformed input.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Latest representable position on the day axis, in decimal hours.
///
/// The grid tracks minute precision, so end-of-day is 23:59.
pub const END_OF_DAY_HOURS: f64 = 23.0 + 59.0 / 60.0;

/// Error returned when a clock-time string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    /// Input was empty or contained no digits.
    #[error("empty time string")]
    Empty,

    /// Input did not match `"HH:MM"` or 4-digit `"HHMM"`.
    #[error("malformed time string: {0:?}")]
    Malformed(String),

    /// Hour or minute component was out of range.
    #[error("time out of range: {0:?}")]
    OutOfRange(String),
}

/// A time of day with minute precision.
///
/// Displays and serializes as `"HH:MM"` (24-hour). Parses from either
/// `"HH:MM"` or the zero-padded 4-digit `"HHMM"` form used by older
/// planning sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Creates a `ClockTime`, validating both components.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError::OutOfRange`] if `hour >= 24` or
    /// `minute >= 60`.
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeParseError> {
        if hour >= 24 || minute >= 60 {
            return Err(TimeParseError::OutOfRange(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    /// Extracts the clock time from a [`NaiveTime`], dropping seconds.
    #[must_use]
    pub fn from_time(time: NaiveTime) -> Self {
        // Hour and minute from chrono are always in range.
        #[allow(clippy::cast_possible_truncation)]
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Returns the hour component (0–23).
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute component (0–59).
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Converts to decimal hours (`h + m/60`), the aggregator's time axis.
    #[must_use]
    pub fn as_hours(&self) -> f64 {
        f64::from(self.hour) + f64::from(self.minute) / 60.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TimeParseError::Empty);
        }

        let (hour_str, minute_str) = if let Some((h, m)) = trimmed.split_once(':') {
            (h, m)
        } else if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
            trimmed.split_at(2)
        } else {
            return Err(TimeParseError::Malformed(trimmed.to_string()));
        };

        let hour: u8 = hour_str
            .parse()
            .map_err(|_| TimeParseError::Malformed(trimmed.to_string()))?;
        let minute: u8 = minute_str
            .parse()
            .map_err(|_| TimeParseError::Malformed(trimmed.to_string()))?;

        Self::new(hour, minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Converts a timestamp's time of day to decimal hours at minute precision.
///
/// Seconds are intentionally dropped: snapshots are plotted and aggregated
/// on a minute grid.
#[must_use]
pub fn decimal_hours(time: NaiveTime) -> f64 {
    ClockTime::from_time(time).as_hours()
}

/// Parses a `"HH:MM"` or `"HHMM"` string directly to decimal hours.
///
/// # Errors
///
/// Returns a [`TimeParseError`] on empty, malformed, or out-of-range input.
pub fn parse_time_to_hours(s: &str) -> Result<f64, TimeParseError> {
    s.parse::<ClockTime>().map(|t| t.as_hours())
}
