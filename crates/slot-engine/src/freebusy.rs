//! Busy/free views of a day and the empty-hours computation over a date range.
//!
//! Busy periods come from non-cancelled appointments, merged and clipped to a
//! window. Free periods are the gaps between them.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use tracing::debug;

use crate::appointment::Appointment;
use crate::clock::ClockTime;
use crate::config::{DaySchedule, WeeklySchedule};
use crate::error::{Result, ScheduleError};
use crate::store::{fetch_day, AppointmentStore};

/// A contiguous free stretch inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreePeriod {
    pub start: ClockTime,
    pub end: ClockTime,
    pub duration_minutes: u32,
}

impl FreePeriod {
    fn new(start: ClockTime, end: ClockTime) -> Self {
        FreePeriod {
            start,
            end,
            duration_minutes: start.minutes_until(end),
        }
    }

    /// Whether `[start, start + minutes)` lies entirely inside this period.
    pub fn fits(&self, start: ClockTime, minutes: u32) -> bool {
        start >= self.start
            && start
                .minutes()
                .checked_add(minutes)
                .is_some_and(|end| end <= self.end.minutes())
    }
}

/// Merge overlapping or adjacent busy periods, clipped to the given window.
///
/// Returns a sorted, non-overlapping list of (start, end) intervals.
pub fn merge_busy_periods(
    appointments: &[Appointment],
    window_start: ClockTime,
    window_end: ClockTime,
) -> Vec<(ClockTime, ClockTime)> {
    let mut intervals: Vec<(ClockTime, ClockTime)> = appointments
        .iter()
        .filter(|a| a.is_active() && a.start < window_end && a.end > window_start)
        .map(|a| (a.start.max(window_start), a.end.min(window_end)))
        .collect();

    intervals.sort_unstable();

    let mut merged: Vec<(ClockTime, ClockTime)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Free periods between `window_start` and `window_end`, sorted by start.
pub fn free_periods(
    appointments: &[Appointment],
    window_start: ClockTime,
    window_end: ClockTime,
) -> Vec<FreePeriod> {
    if window_start >= window_end {
        return Vec::new();
    }

    let mut free = Vec::new();
    let mut cursor = window_start;

    for (busy_start, busy_end) in merge_busy_periods(appointments, window_start, window_end) {
        if cursor < busy_start {
            free.push(FreePeriod::new(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < window_end {
        free.push(FreePeriod::new(cursor, window_end));
    }

    free
}

/// An unbooked fixed-length block inside a working day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptySlot {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub start: ClockTime,
    pub end: ClockTime,
    pub hours: f64,
}

/// Unbooked working time across a date range.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EmptyHoursReport {
    pub slots: Vec<EmptySlot>,
    pub total_hours: f64,
}

/// Cut a working day into consecutive `slot_minutes` blocks and keep those no
/// active appointment overlaps.
///
/// Blocks step by their own length from the day's start; a trailing remainder
/// shorter than `slot_minutes` is not reported. Non-working days yield nothing.
pub fn empty_slots_for_day(
    date: NaiveDate,
    day: &DaySchedule,
    appointments: &[Appointment],
    slot_minutes: u32,
) -> Vec<EmptySlot> {
    if !day.is_working_day || slot_minutes == 0 {
        return Vec::new();
    }

    let hours = f64::from(slot_minutes) / 60.0;
    let mut slots = Vec::new();
    let mut cursor = day.start;

    while let Some(slot_end) = cursor.checked_add_minutes(slot_minutes) {
        if slot_end > day.end {
            break;
        }
        let occupied = appointments
            .iter()
            .filter(|a| a.is_active())
            .any(|a| cursor < a.end && a.start < slot_end);
        if !occupied {
            slots.push(EmptySlot {
                date,
                weekday: date.weekday(),
                start: cursor,
                end: slot_end,
                hours,
            });
        }
        cursor = slot_end;
    }

    slots
}

/// Collect empty working blocks for every day in `from..=to`.
///
/// Only days the weekly schedule marks as working are read from the store.
///
/// # Errors
/// Returns `ScheduleError::InvalidDuration` for a zero `slot_minutes`, and
/// `ScheduleError::Retrieval` if any day's appointments cannot be read.
pub fn empty_hours_report<S: AppointmentStore + ?Sized>(
    store: &S,
    week: &WeeklySchedule,
    from: NaiveDate,
    to: NaiveDate,
    slot_minutes: u32,
) -> Result<EmptyHoursReport> {
    if slot_minutes == 0 {
        return Err(ScheduleError::InvalidDuration(slot_minutes));
    }

    let mut report = EmptyHoursReport::default();

    for date in from.iter_days().take_while(|d| *d <= to) {
        let day = week.for_date(date);
        if !day.is_working_day {
            continue;
        }
        let appointments = fetch_day(store, date)?;
        let day_slots = empty_slots_for_day(date, day, &appointments, slot_minutes);
        report.total_hours += day_slots.iter().map(|s| s.hours).sum::<f64>();
        report.slots.extend(day_slots);
    }

    debug!(
        %from,
        %to,
        slots = report.slots.len(),
        total_hours = report.total_hours,
        "computed empty hours"
    );
    Ok(report)
}
