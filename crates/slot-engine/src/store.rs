//! The persistence seam the engine reads appointments through.
//!
//! The engine never writes. Creating, rescheduling and cancelling appointments
//! belong to whoever owns the store; the engine only asks for one day at a time.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::appointment::{Appointment, AppointmentId, AppointmentStatus};
use crate::error::{Result, ScheduleError, StoreError};

/// Read access to stored appointments.
pub trait AppointmentStore {
    /// Every appointment on `date`, cancelled ones included, ordered by start time.
    fn list_appointments(&self, date: NaiveDate) -> std::result::Result<Vec<Appointment>, StoreError>;
}

impl<S: AppointmentStore + ?Sized> AppointmentStore for &S {
    fn list_appointments(&self, date: NaiveDate) -> std::result::Result<Vec<Appointment>, StoreError> {
        (**self).list_appointments(date)
    }
}

impl<S: AppointmentStore + ?Sized> AppointmentStore for Box<S> {
    fn list_appointments(&self, date: NaiveDate) -> std::result::Result<Vec<Appointment>, StoreError> {
        (**self).list_appointments(date)
    }
}

/// Fetch a day's appointments and reject records the engine cannot reason about.
///
/// Store failures and malformed records both surface as `ScheduleError::Retrieval`
/// so callers never mistake missing data for a free calendar.
pub(crate) fn fetch_day<S: AppointmentStore + ?Sized>(store: &S, date: NaiveDate) -> Result<Vec<Appointment>> {
    let appointments = store.list_appointments(date).map_err(|source| {
        warn!(%date, error = %source, "appointment retrieval failed");
        ScheduleError::Retrieval { date, source }
    })?;

    for appt in &appointments {
        if appt.date != date || appt.start >= appt.end {
            let source = StoreError::Malformed(format!(
                "appointment {} on {} spans {}-{}",
                appt.id, appt.date, appt.start, appt.end
            ));
            warn!(%date, error = %source, "rejecting appointment data");
            return Err(ScheduleError::Retrieval { date, source });
        }
    }

    debug!(%date, count = appointments.len(), "fetched appointments");
    Ok(appointments)
}

/// A process-local store keyed by appointment id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    appointments: BTreeMap<AppointmentId, Appointment>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON array of appointments.
    ///
    /// # Errors
    /// Returns `StoreError::Malformed` if the JSON does not decode or a record has
    /// `start >= end`.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, StoreError> {
        let records: Vec<Appointment> =
            serde_json::from_str(json).map_err(|e| StoreError::Malformed(e.to_string()))?;
        if let Some(bad) = records.iter().find(|a| a.start >= a.end) {
            return Err(StoreError::Malformed(format!(
                "appointment {} spans {}-{}",
                bad.id, bad.start, bad.end
            )));
        }
        Ok(records.into_iter().collect())
    }

    /// Insert or replace an appointment, returning the previous record with that id.
    pub fn insert(&mut self, appointment: Appointment) -> Option<Appointment> {
        self.appointments.insert(appointment.id, appointment)
    }

    pub fn get(&self, id: AppointmentId) -> Option<&Appointment> {
        self.appointments.get(&id)
    }

    /// Change an appointment's status. Returns `false` if the id is unknown.
    pub fn set_status(&mut self, id: AppointmentId, status: AppointmentStatus) -> bool {
        match self.appointments.get_mut(&id) {
            Some(appt) => {
                appt.status = status;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: AppointmentId) -> Option<Appointment> {
        self.appointments.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}

impl FromIterator<Appointment> for InMemoryStore {
    fn from_iter<I: IntoIterator<Item = Appointment>>(iter: I) -> Self {
        let mut store = InMemoryStore::new();
        for appt in iter {
            store.insert(appt);
        }
        store
    }
}

impl AppointmentStore for InMemoryStore {
    fn list_appointments(&self, date: NaiveDate) -> std::result::Result<Vec<Appointment>, StoreError> {
        let mut day: Vec<Appointment> = self
            .appointments
            .values()
            .filter(|a| a.date == date)
            .cloned()
            .collect();
        day.sort_by_key(|a| (a.start, a.end, a.id));
        Ok(day)
    }
}
