//! The collaborator told about each booking decision.
//!
//! Delivery (email, SMS, UI toast) is the implementor's business. Notifiers are
//! called synchronously and cannot fail the decision that triggered them.

use crate::scheduler::BookingDecision;

pub trait Notifier {
    fn notify(&self, decision: &BookingDecision);
}

/// Discards every decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _decision: &BookingDecision) {}
}

impl<F: Fn(&BookingDecision)> Notifier for F {
    fn notify(&self, decision: &BookingDecision) {
        self(decision)
    }
}
