//! Error types for slot-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::clock::ClockTime;

/// Failures reported by an [`AppointmentStore`](crate::store::AppointmentStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached or queried.
    #[error("Appointment store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be interpreted (bad time, bad status, start >= end).
    #[error("Malformed appointment record: {0}")]
    Malformed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Appointment data for the day could not be obtained. Availability is unknown.
    #[error("Could not retrieve appointments for {date}: {source}")]
    Retrieval { date: NaiveDate, source: StoreError },

    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval { start: ClockTime, end: ClockTime },

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid duration: {0} minutes")]
    InvalidDuration(u32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
