//! Bookable start times for a fixed slot duration inside a working window.
//!
//! The default [`SlotMode::Discretized`] scan works on a grid of
//! `granularity`-minute marks:
//!
//! 1. Every non-cancelled appointment marks `start, start + g, ...` while the
//!    mark is before its end.
//! 2. Candidates are `window_start, window_start + g, ...` before `window_end`.
//! 3. A candidate is free when none of `t, t + g, ...` below `t + duration` is
//!    marked and `t + duration <= window_end`.
//!
//! The marks only describe an appointment exactly when its bounds sit on the
//! grid. An appointment at 09:10-09:40 marks 09:10 and 09:25, which no
//! candidate on a 15-minute grid ever probes, so it blocks nothing. That
//! behaviour is kept as the default for compatibility; [`SlotMode::Exact`]
//! tests candidates against the real half-open intervals instead.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::appointment::Appointment;
use crate::clock::{ClockTime, MINUTES_PER_DAY};
use crate::error::{Result, ScheduleError};
use crate::freebusy;
use crate::store::{fetch_day, AppointmentStore};

/// Default scan step in minutes.
pub const DEFAULT_GRANULARITY: u32 = 15;

/// How candidate slots are tested against existing bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotMode {
    /// Grid-mark comparison. Exact only for grid-aligned appointments.
    #[default]
    Discretized,
    /// Half-open interval overlap against each appointment.
    Exact,
}

/// Parameters for one slot computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotParams {
    /// Slot length in minutes. Need not be a multiple of `granularity`.
    pub duration: u32,
    /// Step between candidate starts (and between booked marks).
    pub granularity: u32,
    pub mode: SlotMode,
}

impl Default for SlotParams {
    fn default() -> Self {
        SlotParams {
            duration: 30,
            granularity: DEFAULT_GRANULARITY,
            mode: SlotMode::default(),
        }
    }
}

impl SlotParams {
    pub fn with_duration(duration: u32) -> Self {
        SlotParams {
            duration,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.duration == 0 || self.duration > MINUTES_PER_DAY {
            return Err(ScheduleError::InvalidDuration(self.duration));
        }
        if self.granularity == 0 {
            return Err(ScheduleError::InvalidConfig(
                "granularity must be at least one minute".to_string(),
            ));
        }
        Ok(())
    }
}

/// Grid marks covered by non-cancelled appointments, stepping `granularity`
/// minutes from each appointment's start.
pub fn booked_marks(appointments: &[Appointment], granularity: u32) -> BTreeSet<u32> {
    let mut marks = BTreeSet::new();
    if granularity == 0 {
        return marks;
    }
    for appt in appointments.iter().filter(|a| a.is_active()) {
        marks.extend((appt.start.minutes()..appt.end.minutes()).step_by(granularity as usize));
    }
    marks
}

/// Start times in `[window_start, window_end)` at which a slot of
/// `params.duration` minutes can be booked, in chronological order.
///
/// An empty or inverted window yields no slots.
///
/// # Errors
/// Returns `ScheduleError::InvalidDuration` for a zero duration or one longer
/// than a day, and
/// `ScheduleError::InvalidConfig` for a zero granularity.
pub fn available_slots(
    appointments: &[Appointment],
    window_start: ClockTime,
    window_end: ClockTime,
    params: &SlotParams,
) -> Result<Vec<ClockTime>> {
    params.validate()?;
    if window_start >= window_end {
        return Ok(Vec::new());
    }

    let step = params.granularity as usize;
    let candidates = (window_start.minutes()..window_end.minutes())
        .step_by(step)
        .filter_map(|t| {
            t.checked_add(params.duration)
                .filter(|end| *end <= window_end.minutes())
                .map(|end| (t, end))
        });

    let slots: Vec<u32> = match params.mode {
        SlotMode::Discretized => {
            let booked = booked_marks(appointments, params.granularity);
            candidates
                .filter(|&(t, end)| (t..end).step_by(step).all(|mark| !booked.contains(&mark)))
                .map(|(t, _)| t)
                .collect()
        }
        SlotMode::Exact => {
            let free = freebusy::free_periods(appointments, window_start, window_end);
            candidates
                .filter(|&(t, _)| {
                    ClockTime::from_minutes(t)
                        .is_some_and(|start| free.iter().any(|p| p.fits(start, params.duration)))
                })
                .map(|(t, _)| t)
                .collect()
        }
    };

    Ok(slots.into_iter().filter_map(ClockTime::from_minutes).collect())
}

/// Read `date` from `store` and compute its available slots.
///
/// # Errors
/// Everything [`available_slots`] returns, plus `ScheduleError::Retrieval` when
/// the store fails. An empty window short-circuits before the store is read.
pub fn slots_for_date<S: AppointmentStore + ?Sized>(
    store: &S,
    date: NaiveDate,
    window_start: ClockTime,
    window_end: ClockTime,
    params: &SlotParams,
) -> Result<Vec<ClockTime>> {
    params.validate()?;
    if window_start >= window_end {
        return Ok(Vec::new());
    }
    let appointments = fetch_day(store, date)?;
    let slots = available_slots(&appointments, window_start, window_end, params)?;
    debug!(
        %date,
        %window_start,
        %window_end,
        duration = params.duration,
        mode = ?params.mode,
        available = slots.len(),
        "generated slots"
    );
    Ok(slots)
}

/// A slot list that may stand in for a failed computation.
///
/// When `degraded` is set the empty `slots` mean "unknown", not "fully booked".
#[derive(Debug, Clone, PartialEq)]
pub struct SlotListing {
    pub slots: Vec<String>,
    pub degraded: Option<ScheduleError>,
}

impl SlotListing {
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

impl From<Result<Vec<String>>> for SlotListing {
    fn from(result: Result<Vec<String>>) -> Self {
        match result {
            Ok(slots) => SlotListing {
                slots,
                degraded: None,
            },
            Err(err) => SlotListing {
                slots: Vec::new(),
                degraded: Some(err),
            },
        }
    }
}

/// Render slot starts as `HH:MM` strings.
pub fn format_slots(slots: &[ClockTime]) -> Vec<String> {
    slots.iter().map(ToString::to_string).collect()
}
