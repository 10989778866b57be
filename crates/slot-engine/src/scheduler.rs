//! String-typed entry points for the appointment-management and UI layers.
//!
//! [`Scheduler`] owns a store, a notifier and a [`SchedulerConfig`]. Each call
//! reads the day it needs, computes, and returns; nothing is cached between
//! calls. The availability check is advisory: two callers racing between
//! "check" and "book" can both see a free slot, so booking must be serialized
//! by whoever writes to the store.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::appointment::{AppointmentId, TimeInterval};
use crate::clock::{parse_date, ClockTime};
use crate::config::{SchedulerConfig, WorkingWindow};
use crate::conflict::{conflicts_in_store, is_time_available};
use crate::error::Result;
use crate::freebusy::{empty_hours_report, free_periods, EmptyHoursReport, FreePeriod};
use crate::notify::{NoopNotifier, Notifier};
use crate::slots::{format_slots, slots_for_date, SlotListing};
use crate::store::{fetch_day, AppointmentStore};

/// A proposed booking or reschedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    pub patient_id: Option<i64>,
    /// The appointment being moved, ignored when checking for conflicts.
    pub exclude_id: Option<AppointmentId>,
}

impl BookingRequest {
    pub fn new(date: NaiveDate, start: ClockTime, end: ClockTime) -> Self {
        BookingRequest {
            date,
            start,
            end,
            patient_id: None,
            exclude_id: None,
        }
    }

    /// Parse `YYYY-MM-DD` / `HH:MM` inputs.
    pub fn parse(date: &str, start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(parse_date(date)?, start.parse()?, end.parse()?))
    }

    pub fn for_patient(mut self, patient_id: i64) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    /// Mark this request as moving an existing appointment.
    pub fn rescheduling(mut self, id: AppointmentId) -> Self {
        self.exclude_id = Some(id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum BookingOutcome {
    Accepted,
    Rejected { conflicting_ids: Vec<AppointmentId> },
}

/// The result of a [`Scheduler::propose`] call, as handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingDecision {
    pub request: BookingRequest,
    #[serde(flatten)]
    pub outcome: BookingOutcome,
}

impl BookingDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, BookingOutcome::Accepted)
    }
}

pub struct Scheduler<S, N = NoopNotifier> {
    store: S,
    notifier: N,
    config: SchedulerConfig,
}

impl<S: AppointmentStore> Scheduler<S> {
    /// A scheduler with default configuration and no notifications.
    pub fn new(store: S) -> Self {
        Scheduler {
            store,
            notifier: NoopNotifier,
            config: SchedulerConfig::default(),
        }
    }
}

impl<S: AppointmentStore, N: Notifier> Scheduler<S, N> {
    pub fn with_notifier<M: Notifier>(self, notifier: M) -> Scheduler<S, M> {
        Scheduler {
            store: self.store,
            notifier,
            config: self.config,
        }
    }

    /// # Errors
    /// Returns `ScheduleError::InvalidConfig` if `config` fails validation.
    pub fn with_config(mut self, config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access for embedders whose store is also their write model.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// `true` iff `[start, end)` on `date` overlaps no non-cancelled appointment
    /// other than `exclude_id`.
    ///
    /// # Errors
    /// `InvalidDate` / `InvalidTime` for unparseable input, `InvalidInterval` when
    /// `start >= end`, `Retrieval` when the store fails.
    pub fn is_time_available(
        &self,
        date: &str,
        start: &str,
        end: &str,
        exclude_id: Option<AppointmentId>,
    ) -> Result<bool> {
        let date = parse_date(date)?;
        is_time_available(&self.store, date, start.parse()?, end.parse()?, exclude_id)
    }

    /// Start times (`HH:MM`) at which a `duration`-minute slot fits between
    /// `start_hour:00` and `end_hour:00`. Unset arguments use the configured
    /// defaults (30 minutes, 9 to 18).
    ///
    /// `start_hour >= end_hour` yields an empty list without reading the store.
    ///
    /// # Errors
    /// `InvalidDate`, `InvalidDuration` for a zero duration or one longer than a
    /// day, `InvalidTime` for an hour past 24 in a non-empty window, `Retrieval`
    /// when the store fails.
    pub fn get_available_time_slots(
        &self,
        date: &str,
        duration: Option<u32>,
        start_hour: Option<u32>,
        end_hour: Option<u32>,
    ) -> Result<Vec<String>> {
        let date = parse_date(date)?;
        let window = WorkingWindow::new(
            start_hour.unwrap_or(self.config.window.start_hour),
            end_hour.unwrap_or(self.config.window.end_hour),
        );
        if window.is_empty() {
            debug!(%date, ?window, "empty working window");
            return Ok(Vec::new());
        }
        let (window_start, window_end) = window.bounds()?;
        let params = self.config.slot_params(duration);
        let slots = slots_for_date(&self.store, date, window_start, window_end, &params)?;
        Ok(format_slots(&slots))
    }

    /// [`get_available_time_slots`](Self::get_available_time_slots) for callers
    /// that must always render something. Failures come back as an empty,
    /// degraded listing carrying the error.
    pub fn slots_or_empty(
        &self,
        date: &str,
        duration: Option<u32>,
        start_hour: Option<u32>,
        end_hour: Option<u32>,
    ) -> SlotListing {
        let listing = SlotListing::from(self.get_available_time_slots(date, duration, start_hour, end_hour));
        if let Some(err) = &listing.degraded {
            warn!(date, error = %err, "slot listing degraded to empty");
        }
        listing
    }

    /// Slots inside the weekly schedule's hours for `date`'s weekday. Days off
    /// have no slots.
    ///
    /// # Errors
    /// Same as [`get_available_time_slots`](Self::get_available_time_slots).
    pub fn slots_for_day(&self, date: &str, duration: Option<u32>) -> Result<Vec<String>> {
        let date = parse_date(date)?;
        let day = self.config.week.for_date(date);
        let params = self.config.slot_params(duration);
        if !day.is_working_day {
            debug!(%date, "not a working day");
            return Ok(Vec::new());
        }
        let slots = slots_for_date(&self.store, date, day.start, day.end, &params)?;
        Ok(format_slots(&slots))
    }

    /// Contiguous free periods inside the configured default window.
    ///
    /// # Errors
    /// `InvalidDate`, `InvalidTime` for a window past 24:00, `Retrieval`.
    pub fn free_periods(&self, date: &str) -> Result<Vec<FreePeriod>> {
        let date = parse_date(date)?;
        let (window_start, window_end) = self.config.window.bounds()?;
        let appointments = fetch_day(&self.store, date)?;
        Ok(free_periods(&appointments, window_start, window_end))
    }

    /// Unbooked working blocks of `empty_slot_minutes` for every day in
    /// `from..=to`, following the weekly schedule.
    ///
    /// # Errors
    /// `InvalidDate`, `Retrieval`.
    pub fn empty_hours(&self, from: &str, to: &str) -> Result<EmptyHoursReport> {
        empty_hours_report(
            &self.store,
            &self.config.week,
            parse_date(from)?,
            parse_date(to)?,
            self.config.empty_slot_minutes,
        )
    }

    /// Check a booking against the store and tell the notifier the outcome.
    ///
    /// Invalid input and retrieval failures are returned as errors and never
    /// reach the notifier.
    ///
    /// # Errors
    /// `InvalidInterval` when `start >= end`, `Retrieval` when the store fails.
    pub fn propose(&self, request: BookingRequest) -> Result<BookingDecision> {
        let candidate = TimeInterval::new(request.date, request.start, request.end)?;
        let conflicts = conflicts_in_store(&self.store, &candidate, request.exclude_id)?;

        let outcome = if conflicts.is_empty() {
            BookingOutcome::Accepted
        } else {
            let conflicting_ids: Vec<AppointmentId> =
                conflicts.iter().map(|c| c.appointment.id).collect();
            warn!(
                date = %request.date,
                start = %request.start,
                end = %request.end,
                ?conflicting_ids,
                "booking rejected"
            );
            BookingOutcome::Rejected { conflicting_ids }
        };

        let decision = BookingDecision { request, outcome };
        self.notifier.notify(&decision);
        Ok(decision)
    }
}
