//! Decide whether a proposed appointment time collides with existing bookings.
//!
//! A candidate `[start, end)` conflicts with every non-cancelled appointment on
//! the same day it overlaps. Adjacent appointments (one ends exactly when the
//! other starts) are NOT conflicts.

use chrono::NaiveDate;
use tracing::debug;

use crate::appointment::{Appointment, AppointmentId, TimeInterval};
use crate::clock::ClockTime;
use crate::error::Result;
use crate::store::{fetch_day, AppointmentStore};

/// An existing appointment that overlaps a candidate interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub appointment: Appointment,
    pub overlap_minutes: u32,
}

/// Find every appointment in `appointments` that overlaps `candidate`.
///
/// Cancelled appointments, appointments on other days and the appointment named
/// by `exclude_id` are skipped. The overlap duration is
/// `min(a.end, b.end) - max(a.start, b.start)`.
pub fn find_conflicts(
    candidate: &TimeInterval,
    appointments: &[Appointment],
    exclude_id: Option<AppointmentId>,
) -> Vec<Conflict> {
    appointments
        .iter()
        .filter(|appt| appt.is_active() && Some(appt.id) != exclude_id)
        .filter_map(|appt| {
            let existing = appt.interval();
            // Two intervals overlap iff a.start < b.end AND b.start < a.end.
            candidate.overlaps(&existing).then(|| Conflict {
                appointment: appt.clone(),
                overlap_minutes: candidate.overlap_minutes(&existing),
            })
        })
        .collect()
}

/// Read the candidate's day from `store` and return the conflicts found there.
///
/// # Errors
/// Returns `ScheduleError::Retrieval` if the store cannot supply the day's
/// appointments.
pub fn conflicts_in_store<S: AppointmentStore + ?Sized>(
    store: &S,
    candidate: &TimeInterval,
    exclude_id: Option<AppointmentId>,
) -> Result<Vec<Conflict>> {
    let appointments = fetch_day(store, candidate.date)?;
    let conflicts = find_conflicts(candidate, &appointments, exclude_id);
    debug!(
        date = %candidate.date,
        start = %candidate.start,
        end = %candidate.end,
        ?exclude_id,
        conflicts = conflicts.len(),
        "checked availability"
    );
    Ok(conflicts)
}

/// `true` iff no non-cancelled appointment on `date`, other than `exclude_id`,
/// overlaps `[start, end)`.
///
/// # Errors
/// Returns `ScheduleError::InvalidInterval` if `start >= end`, and
/// `ScheduleError::Retrieval` if the store fails. A failed lookup is never
/// reported as available.
pub fn is_time_available<S: AppointmentStore + ?Sized>(
    store: &S,
    date: NaiveDate,
    start: ClockTime,
    end: ClockTime,
    exclude_id: Option<AppointmentId>,
) -> Result<bool> {
    let candidate = TimeInterval::new(date, start, end)?;
    Ok(conflicts_in_store(store, &candidate, exclude_id)?.is_empty())
}
