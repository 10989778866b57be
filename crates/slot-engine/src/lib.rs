//! # slot-engine
//!
//! Appointment scheduling for a single shared clinic calendar.
//!
//! Answers two questions against whatever appointment store the caller plugs
//! in: does a proposed time collide with an existing booking, and at which
//! times could a slot of a given length still be booked on a given day.
//!
//! ## Modules
//!
//! - [`clock`] — minute-resolution times and `YYYY-MM-DD` dates
//! - [`appointment`] — appointment records, statuses, same-day intervals
//! - [`store`] — the read-only persistence seam plus an in-memory store
//! - [`conflict`] — availability checks with half-open overlap
//! - [`slots`] — bookable start times on a discretized grid
//! - [`freebusy`] — merged busy periods, free periods, empty working hours
//! - [`config`] — working window, slot parameters, weekly schedule
//! - [`notify`] — the booking-decision notification seam
//! - [`scheduler`] — the string-typed facade tying it together
//! - [`error`] — error types

pub mod appointment;
pub mod clock;
pub mod config;
pub mod conflict;
pub mod error;
pub mod freebusy;
pub mod notify;
pub mod scheduler;
pub mod slots;
pub mod store;

pub use appointment::{Appointment, AppointmentId, AppointmentStatus, TimeInterval};
pub use clock::ClockTime;
pub use config::{DaySchedule, SchedulerConfig, WeeklySchedule, WorkingWindow};
pub use conflict::{find_conflicts, is_time_available, Conflict};
pub use error::{ScheduleError, StoreError};
pub use freebusy::{free_periods, EmptyHoursReport, FreePeriod};
pub use notify::{NoopNotifier, Notifier};
pub use scheduler::{BookingDecision, BookingOutcome, BookingRequest, Scheduler};
pub use slots::{available_slots, SlotListing, SlotMode, SlotParams};
pub use store::{AppointmentStore, InMemoryStore};
