//! Log-backed notification sink
//!
//! Stands in for an SMS/email gateway: messages land in the log stream
//! and nowhere else. Delivery failure is impossible, which matches the
//! fire-and-forget contract of the port.

use domain_ledger::{Customer, NotificationSink};

/// [`NotificationSink`] that writes each message to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingNotifier {
    fn notify(&self, customer: &Customer, message: &str) {
        tracing::info!(
            customer_id = %customer.id,
            email = %customer.email,
            phone = %customer.phone,
            message,
            "NOTIFICATION"
        );
    }
}
