//! The timestamp type of the generated runtime.

use std::ops::Add;

use chrono::{DateTime, FixedOffset, Utc};

/// A point in time, stored as whole seconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Time(pub i64);

impl Time {
    pub fn from_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        Ok(Time(
            DateTime::<FixedOffset>::parse_from_rfc3339(s)?.timestamp(),
        ))
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Time(dt.timestamp())
    }

    pub fn from_naive_datetime(dt: chrono::NaiveDateTime) -> Self {
        Time(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc).timestamp())
    }

    pub fn from_timestamp(timestamp: i64) -> Self {
        Time(timestamp)
    }

    pub fn timestamp(&self) -> i64 {
        self.0
    }

    /// `None` when the timestamp falls outside chrono's representable range.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.0, 0)
    }
}

impl From<i64> for Time {
    fn from(i: i64) -> Self {
        Time(i)
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Self) -> Self::Output {
        Time(self.0 + rhs.0)
    }
}

impl Add<i64> for Time {
    type Output = Time;

    fn add(self, rhs: i64) -> Self::Output {
        Time(self.0 + rhs)
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "Time({})", self.0),
        }
    }
}

impl std::fmt::Debug for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_datetime() {
            Some(dt) => write!(f, "{}", dt.naive_utc()),
            None => write!(f, "Time({})", self.0),
        }
    }
}
