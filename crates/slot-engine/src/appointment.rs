//! Appointment records and same-day time intervals.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::error::{Result, ScheduleError, StoreError};

pub type AppointmentId = i64;

/// Lifecycle status of an appointment.
///
/// Cancelled appointments stay in the store for history but never block time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Whether an appointment in this status occupies its time range.
    pub fn blocks_time(self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> std::result::Result<Self, StoreError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(StoreError::Malformed(format!(
                "unknown appointment status `{other}`"
            ))),
        }
    }
}

/// A half-open `[start, end)` range on a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeInterval {
    /// # Errors
    /// Returns `ScheduleError::InvalidInterval` unless `start < end`.
    pub fn new(date: NaiveDate, start: ClockTime, end: ClockTime) -> Result<Self> {
        if start >= end {
            return Err(ScheduleError::InvalidInterval { start, end });
        }
        Ok(TimeInterval { date, start, end })
    }

    /// Two intervals overlap iff they share a day and `a.start < b.end && b.start < a.end`.
    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }

    /// Minutes shared with `other`, zero when they do not overlap.
    pub fn overlap_minutes(&self, other: &TimeInterval) -> u32 {
        if !self.overlaps(other) {
            return 0;
        }
        self.start.max(other.start).minutes_until(self.end.min(other.end))
    }

    pub fn duration_minutes(&self) -> u32 {
        self.start.minutes_until(self.end)
    }
}

/// A booked appointment as held by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    #[serde(default)]
    pub patient_id: Option<i64>,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: String,
}

impl Appointment {
    /// Create a `scheduled` appointment with no patient or notes attached.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidInterval` unless `start < end`.
    pub fn new(id: AppointmentId, date: NaiveDate, start: ClockTime, end: ClockTime) -> Result<Self> {
        TimeInterval::new(date, start, end)?;
        Ok(Appointment {
            id,
            patient_id: None,
            date,
            start,
            end,
            status: AppointmentStatus::default(),
            notes: String::new(),
        })
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_patient(mut self, patient_id: i64) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn interval(&self) -> TimeInterval {
        TimeInterval {
            date: self.date,
            start: self.start,
            end: self.end,
        }
    }

    /// Not cancelled.
    pub fn is_active(&self) -> bool {
        self.status.blocks_time()
    }

    pub fn duration_minutes(&self) -> u32 {
        self.start.minutes_until(self.end)
    }
}
