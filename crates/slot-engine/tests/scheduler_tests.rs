//! Tests for the string-typed scheduler facade.

use std::cell::RefCell;

use chrono::NaiveDate;
use slot_engine::{
    Appointment, AppointmentStatus, AppointmentStore, BookingDecision, BookingOutcome,
    BookingRequest, ClockTime, InMemoryStore, ScheduleError, Scheduler, SchedulerConfig, SlotMode,
    StoreError,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

const DAY: &str = "2025-06-10";

fn t(s: &str) -> ClockTime {
    s.parse().unwrap()
}

fn appt(id: i64, start: &str, end: &str) -> Appointment {
    let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    Appointment::new(id, date, t(start), t(end)).unwrap()
}

fn scheduler_with(appointments: Vec<Appointment>) -> Scheduler<InMemoryStore> {
    Scheduler::new(appointments.into_iter().collect())
}

struct Down;

impl AppointmentStore for Down {
    fn list_appointments(&self, _date: NaiveDate) -> Result<Vec<Appointment>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

// ── is_time_available ───────────────────────────────────────────────────────

#[test]
fn availability_around_a_half_hour_booking() {
    let scheduler = scheduler_with(vec![appt(1, "09:00", "09:30")]);

    assert!(scheduler.is_time_available(DAY, "09:30", "10:00", None).unwrap());
    assert!(!scheduler.is_time_available(DAY, "09:15", "09:45", None).unwrap());
    assert!(scheduler.is_time_available(DAY, "08:30", "09:00", None).unwrap());
}

#[test]
fn cancelling_reopens_the_time() {
    let mut scheduler = scheduler_with(vec![appt(1, "09:00", "09:30")]);
    assert!(!scheduler.is_time_available(DAY, "09:00", "09:30", None).unwrap());

    scheduler.store_mut().set_status(1, AppointmentStatus::Cancelled);

    assert!(scheduler.is_time_available(DAY, "09:00", "09:30", None).unwrap());
}

#[test]
fn unpadded_input_times_compare_numerically() {
    let scheduler = scheduler_with(vec![appt(1, "09:45", "10:15")]);

    assert!(!scheduler.is_time_available(DAY, "9:50", "10:00", None).unwrap());
    assert!(scheduler.is_time_available(DAY, "9:15", "9:45", None).unwrap());
}

#[test]
fn invalid_inputs_are_typed_errors() {
    let scheduler = scheduler_with(vec![]);

    assert!(matches!(
        scheduler.is_time_available("June 10", "09:00", "10:00", None),
        Err(ScheduleError::InvalidDate(_))
    ));
    assert!(matches!(
        scheduler.is_time_available(DAY, "9am", "10:00", None),
        Err(ScheduleError::InvalidTime(_))
    ));
    assert!(matches!(
        scheduler.is_time_available(DAY, "10:00", "09:00", None),
        Err(ScheduleError::InvalidInterval { .. })
    ));
}

#[test]
fn store_outage_surfaces_as_retrieval_error() {
    let scheduler = Scheduler::new(Down);

    assert!(matches!(
        scheduler.is_time_available(DAY, "09:00", "10:00", None),
        Err(ScheduleError::Retrieval { .. })
    ));
}

// ── get_available_time_slots ────────────────────────────────────────────────

#[test]
fn slots_in_a_one_hour_window() {
    let scheduler = scheduler_with(vec![appt(1, "09:00", "09:30")]);

    let slots = scheduler
        .get_available_time_slots(DAY, Some(30), Some(9), Some(10))
        .unwrap();

    assert_eq!(slots, vec!["09:30"]);
}

#[test]
fn slots_use_configured_defaults() {
    let scheduler = scheduler_with(vec![]);

    let slots = scheduler.get_available_time_slots(DAY, None, None, None).unwrap();

    assert_eq!(slots.len(), 35);
    assert_eq!(slots[0], "09:00");
    assert_eq!(slots[34], "17:30");
}

#[test]
fn slots_with_custom_config() {
    let config = SchedulerConfig {
        slot_duration: 60,
        slot_mode: SlotMode::Exact,
        ..SchedulerConfig::default()
    };
    let scheduler = scheduler_with(vec![appt(1, "09:10", "09:40")])
        .with_config(config)
        .unwrap();

    let slots = scheduler
        .get_available_time_slots(DAY, None, Some(9), Some(11))
        .unwrap();

    assert_eq!(slots, vec!["09:45", "10:00"]);
}

#[test]
fn inverted_hours_give_no_slots() {
    let scheduler = Scheduler::new(Down);

    // The store is down, but an empty window never needs it.
    let slots = scheduler
        .get_available_time_slots(DAY, None, Some(18), Some(9))
        .unwrap();
    assert!(slots.is_empty());
}

#[test]
fn inverted_hours_out_of_range_still_give_no_slots() {
    let scheduler = scheduler_with(vec![]);

    let slots = scheduler
        .get_available_time_slots(DAY, None, Some(25), Some(10))
        .unwrap();
    assert!(slots.is_empty());
}

#[test]
fn duration_longer_than_a_day_rejected() {
    let scheduler = scheduler_with(vec![]);

    assert_eq!(
        scheduler.get_available_time_slots(DAY, Some(u32::MAX), None, None),
        Err(ScheduleError::InvalidDuration(u32::MAX))
    );
    assert_eq!(
        scheduler.get_available_time_slots(DAY, Some(24 * 60 + 1), None, None),
        Err(ScheduleError::InvalidDuration(24 * 60 + 1))
    );
    // A full-day slot is valid; it just never fits in a nine-hour window.
    assert!(scheduler
        .get_available_time_slots(DAY, Some(24 * 60), None, None)
        .unwrap()
        .is_empty());
}

#[test]
fn hour_past_midnight_rejected() {
    let scheduler = scheduler_with(vec![]);
    assert!(matches!(
        scheduler.get_available_time_slots(DAY, None, Some(9), Some(25)),
        Err(ScheduleError::InvalidTime(_))
    ));
}

#[test]
fn zero_duration_rejected() {
    let scheduler = scheduler_with(vec![]);
    assert_eq!(
        scheduler.get_available_time_slots(DAY, Some(0), None, None),
        Err(ScheduleError::InvalidDuration(0))
    );
}

#[test]
fn degraded_listing_carries_the_error() {
    let listing = Scheduler::new(Down).slots_or_empty(DAY, None, None, None);

    assert!(listing.slots.is_empty());
    assert!(listing.is_degraded());
    assert!(matches!(listing.degraded, Some(ScheduleError::Retrieval { .. })));
}

#[test]
fn healthy_listing_is_not_degraded() {
    let listing = scheduler_with(vec![appt(1, "09:00", "18:00")]).slots_or_empty(DAY, None, None, None);

    // Fully booked, and known to be.
    assert!(listing.slots.is_empty());
    assert!(!listing.is_degraded());
}

#[test]
fn repeated_slot_queries_are_identical() {
    let scheduler = scheduler_with(vec![appt(1, "11:00", "12:15"), appt(2, "15:00", "15:30")]);

    let first = scheduler.get_available_time_slots(DAY, Some(45), None, None).unwrap();
    let second = scheduler.get_available_time_slots(DAY, Some(45), None, None).unwrap();
    assert_eq!(first, second);
}

// ── Weekly schedule ─────────────────────────────────────────────────────────

#[test]
fn slots_for_day_follow_the_weekly_schedule() {
    let scheduler = scheduler_with(vec![appt(1, "09:00", "16:00")]);

    // 2025-06-10 is a Tuesday: 09:00-17:00 by default.
    let slots = scheduler.slots_for_day(DAY, Some(30)).unwrap();
    assert_eq!(slots, vec!["16:00", "16:15", "16:30"]);

    // 2025-06-15 is a Sunday.
    assert!(scheduler.slots_for_day("2025-06-15", None).unwrap().is_empty());
}

#[test]
fn free_periods_within_default_window() {
    let scheduler = scheduler_with(vec![appt(1, "12:00", "13:00")]);

    let free = scheduler.free_periods(DAY).unwrap();

    assert_eq!(free.len(), 2);
    assert_eq!(free[0].duration_minutes, 180);
    assert_eq!(free[1].duration_minutes, 300);
}

#[test]
fn empty_hours_over_a_week() {
    let scheduler = scheduler_with(vec![appt(1, "09:00", "11:00")]);

    // Monday 2025-06-09 through Sunday 2025-06-15: five working days of eight hours.
    let report = scheduler.empty_hours("2025-06-09", "2025-06-15").unwrap();

    assert_eq!(report.total_hours, 38.0);
}

// ── propose ─────────────────────────────────────────────────────────────────

#[test]
fn propose_accepts_and_notifies() {
    let seen = RefCell::new(Vec::<BookingDecision>::new());
    let scheduler = scheduler_with(vec![appt(1, "09:00", "09:30")])
        .with_notifier(|d: &BookingDecision| seen.borrow_mut().push(d.clone()));

    let request = BookingRequest::parse(DAY, "09:30", "10:00").unwrap().for_patient(42);
    let decision = scheduler.propose(request.clone()).unwrap();

    assert!(decision.is_accepted());
    assert_eq!(decision.request, request);
    assert_eq!(seen.borrow().as_slice(), &[decision]);
}

#[test]
fn propose_rejects_with_conflicting_ids() {
    let seen = RefCell::new(Vec::<BookingDecision>::new());
    let scheduler = scheduler_with(vec![
        appt(1, "09:00", "09:30"),
        appt(2, "09:30", "10:00"),
        appt(3, "10:00", "10:30").with_status(AppointmentStatus::Cancelled),
    ])
    .with_notifier(|d: &BookingDecision| seen.borrow_mut().push(d.clone()));

    let decision = scheduler
        .propose(BookingRequest::parse(DAY, "09:15", "10:15").unwrap())
        .unwrap();

    assert_eq!(
        decision.outcome,
        BookingOutcome::Rejected {
            conflicting_ids: vec![1, 2]
        }
    );
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn propose_reschedule_ignores_the_moved_appointment() {
    let scheduler = scheduler_with(vec![appt(5, "09:00", "10:00")]);

    let request = BookingRequest::parse(DAY, "09:30", "10:30").unwrap().rescheduling(5);
    assert!(scheduler.propose(request).unwrap().is_accepted());
}

#[test]
fn propose_failures_do_not_notify() {
    let calls = RefCell::new(0);
    let notifier = |_: &BookingDecision| *calls.borrow_mut() += 1;

    let down = Scheduler::new(Down).with_notifier(notifier);
    assert!(matches!(
        down.propose(BookingRequest::parse(DAY, "09:00", "10:00").unwrap()),
        Err(ScheduleError::Retrieval { .. })
    ));

    let healthy = scheduler_with(vec![]).with_notifier(notifier);
    assert!(matches!(
        healthy.propose(BookingRequest::parse(DAY, "10:00", "09:00").unwrap()),
        Err(ScheduleError::InvalidInterval { .. })
    ));

    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn decision_serializes_with_flat_outcome() {
    let decision = scheduler_with(vec![appt(1, "09:00", "09:30")])
        .propose(BookingRequest::parse(DAY, "09:00", "09:30").unwrap())
        .unwrap();

    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["outcome"], "rejected");
    assert_eq!(json["conflicting_ids"], serde_json::json!([1]));
    assert_eq!(json["request"]["start"], "09:00");
    assert_eq!(json["request"]["date"], "2025-06-10");
}
