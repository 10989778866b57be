//! Minute-resolution wall-clock times and calendar-day parsing.
//!
//! Every time the engine touches is held as minutes since midnight, so ordering
//! is numeric and `"9:05"` and `"09:05"` compare equal. Times are always
//! rendered back out in canonical zero-padded `HH:MM` form.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Number of minutes in a calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A time of day with minute resolution.
///
/// Valid values run from `00:00` up to and including `24:00`, the latter only
/// usable as an exclusive end bound (a working window that closes at midnight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);
    pub const END_OF_DAY: ClockTime = ClockTime(MINUTES_PER_DAY as u16);

    /// A compile-time known time. Panics at compile time in const contexts when
    /// past `24:00`.
    pub const fn hm(hour: u16, minute: u16) -> Self {
        assert!(minute < 60 && hour * 60 + minute <= MINUTES_PER_DAY as u16);
        ClockTime(hour * 60 + minute)
    }

    /// Build a time from minutes since midnight. Returns `None` past `24:00`.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(ClockTime(minutes as u16))
    }

    /// Build a time from an hour and minute. `24:00` is accepted, `24:01` is not.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour * 60 + minute)
    }

    /// The top of the given hour (`0..=24`).
    pub fn from_hour(hour: u32) -> Option<Self> {
        Self::from_hm(hour, 0)
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// Add minutes, returning `None` if the result would run past `24:00`.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        Self::from_minutes(self.minutes().checked_add(minutes)?)
    }

    /// Whole minutes from `self` to `later`, saturating at zero.
    pub fn minutes_until(self, later: ClockTime) -> u32 {
        later.minutes().saturating_sub(self.minutes())
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        ClockTime((time.hour() * 60 + time.minute()) as u16)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed == "24:00" {
            return Ok(ClockTime::END_OF_DAY);
        }
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(ClockTime::from)
            .map_err(|_| ScheduleError::InvalidTime(s.to_string()))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

/// Parse a `YYYY-MM-DD` calendar day.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ScheduleError::InvalidDate(s.to_string()))
}
