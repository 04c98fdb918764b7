//! Dunning event log
//!
//! Append-only record of every state transition, its trigger, and
//! free-text detail. Entries are never mutated or deleted by the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, EventLogId};

/// One audit entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DunningEventLog {
    /// Unique identifier
    pub id: EventLogId,
    /// Affected customer
    pub customer_id: CustomerId,
    /// What happened: a status name, "CURED", "BILL_PAID", ...
    pub action_taken: String,
    /// Origin tag: "DUNNING_ENGINE", "SYSTEM_SCHEDULER", an agent or admin id
    pub triggered_by: String,
    /// Free-text detail
    pub details: String,
    /// When the event was recorded
    pub recorded_at: DateTime<Utc>,
}

impl DunningEventLog {
    /// Creates an entry stamped with the current time
    pub fn new(
        customer_id: CustomerId,
        action_taken: impl Into<String>,
        triggered_by: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: EventLogId::new_v7(),
            customer_id,
            action_taken: action_taken.into(),
            triggered_by: triggered_by.into(),
            details: details.into(),
            recorded_at: Utc::now(),
        }
    }
}
