//! Fixed-point message timestamps.
//!
//! The target format identifies every message by a `"<seconds>.<micros>"`
//! string that doubles as the message key, so it must be unique within a
//! channel and totally ordered.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MICROS_PER_SEC: u64 = 1_000_000;

/// A `"seconds.microseconds"` timestamp, always normalized (`micros < 1_000_000`).
///
/// ```
/// use chatmigrate::models::MessageTs;
///
/// let ts = MessageTs::from_millis(1_585_000_123_456);
/// assert_eq!(ts.to_string(), "1585000123.456000");
/// assert_eq!(ts.plus_micros(544_000).to_string(), "1585000124.000000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageTs {
    secs: i64,
    micros: u32,
}

impl MessageTs {
    /// Creates a timestamp, carrying excess microseconds into seconds.
    pub fn new(secs: i64, micros: u64) -> Self {
        Self {
            secs: secs + (micros / MICROS_PER_SEC) as i64,
            micros: (micros % MICROS_PER_SEC) as u32,
        }
    }

    /// Converts epoch milliseconds: seconds by integer division, the
    /// millisecond remainder scaled to six digits.
    pub fn from_millis(ms: i64) -> Self {
        Self {
            secs: ms.div_euclid(1000),
            micros: ms.rem_euclid(1000) as u32 * 1000,
        }
    }

    pub fn secs(&self) -> i64 {
        self.secs
    }

    pub fn micros(&self) -> u32 {
        self.micros
    }

    /// Returns this timestamp shifted forward by `n` microseconds.
    #[must_use]
    pub fn plus_micros(self, n: u64) -> Self {
        Self::new(self.secs, u64::from(self.micros) + n)
    }

    /// The smallest timestamp strictly after this one.
    #[must_use]
    pub fn next(self) -> Self {
        self.plus_micros(1)
    }

    /// The UTC instant this timestamp denotes.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.secs, self.micros * 1000)
    }
}

impl fmt::Display for MessageTs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.secs, self.micros)
    }
}

/// Error returned when a string is not a `"seconds.micros"` timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid message timestamp '{0}'")]
pub struct ParseTsError(String);

impl FromStr for MessageTs {
    type Err = ParseTsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseTsError(s.to_string());
        let (secs, micros) = s.split_once('.').ok_or_else(invalid)?;
        if micros.len() != 6 {
            return Err(invalid());
        }
        let secs = secs.parse::<i64>().map_err(|_| invalid())?;
        let micros = micros.parse::<u32>().map_err(|_| invalid())?;
        Ok(Self { secs, micros })
    }
}

impl Serialize for MessageTs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MessageTs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
