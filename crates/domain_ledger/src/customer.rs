//! Customer account state
//!
//! The customer row is the contended record of the whole system: batch
//! cycles and interactive curing calls both mutate its balance, status,
//! and overdue summary. Dependent entities reference the customer by id
//! only; back-lookup goes through store queries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, CustomerId, Money};

/// Billing model of a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerSegment {
    /// Pay-ahead, usage-capped
    Prepaid,
    /// Billed in arrears
    Postpaid,
}

/// Service delivery state of a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    /// No active subscription
    Inactive,
    /// Full service
    Active,
    /// Service degraded by dunning or a usage cap
    Throttled,
    /// Service suspended by dunning; cleared only through curing
    Blocked,
}

impl ServiceStatus {
    /// Audit log name, matching the stored status strings
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Inactive => "INACTIVE",
            ServiceStatus::Active => "ACTIVE",
            ServiceStatus::Throttled => "THROTTLED",
            ServiceStatus::Blocked => "BLOCKED",
        }
    }
}

/// Aggregated debt position, recomputed by the billing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueSummary {
    /// Sum of unpaid invoice totals
    pub amount_overdue: Money,
    /// Days elapsed since the oldest unpaid invoice's due date
    pub overdue_days: u32,
    /// Due date of the oldest unpaid invoice
    pub due_date: Option<NaiveDate>,
}

impl OverdueSummary {
    /// A cleared summary: no debt, no aging
    pub fn cleared(currency: Currency) -> Self {
        Self {
            amount_overdue: Money::zero(currency),
            overdue_days: 0,
            due_date: None,
        }
    }
}

/// A subscriber account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier
    pub id: CustomerId,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Billing model
    pub segment: CustomerSegment,
    /// Service state
    pub status: ServiceStatus,
    /// Pre-funded wallet balance, never negative
    pub balance: Money,
    /// Sum of unpaid invoice totals, never negative
    pub amount_overdue: Money,
    /// Days since the oldest unpaid due date
    pub overdue_days: u32,
    /// Oldest unpaid due date
    pub due_date: Option<NaiveDate>,
    /// Cumulative metered data, megabytes
    pub data_usage_mb: f64,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a new customer with no service and an empty wallet
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        segment: CustomerSegment,
        currency: Currency,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: CustomerId::new_v7(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
            segment,
            status: ServiceStatus::Inactive,
            balance: Money::zero(currency),
            amount_overdue: Money::zero(currency),
            overdue_days: 0,
            due_date: None,
            data_usage_mb: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true when any unpaid debt is outstanding
    pub fn has_debt(&self) -> bool {
        self.amount_overdue.is_positive()
    }

    /// Applies a recomputed overdue summary
    pub fn apply_overdue_summary(&mut self, summary: OverdueSummary) {
        self.amount_overdue = summary.amount_overdue;
        self.overdue_days = summary.overdue_days;
        self.due_date = summary.due_date;
        self.updated_at = Utc::now();
    }

    /// Current overdue summary as a value
    pub fn overdue_summary(&self) -> OverdueSummary {
        OverdueSummary {
            amount_overdue: self.amount_overdue,
            overdue_days: self.overdue_days,
            due_date: self.due_date,
        }
    }

    /// Moves the customer to a new service status
    pub fn transition(&mut self, status: ServiceStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Credits the wallet
    pub fn credit(&mut self, amount: Money) {
        self.balance = self.balance + amount;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_customer() -> Customer {
        Customer::new(
            "Ravi",
            "Kumar",
            "ravi@example.com",
            "+1-555-0100",
            CustomerSegment::Postpaid,
            Currency::USD,
        )
    }

    #[test]
    fn test_new_customer_defaults() {
        let customer = sample_customer();

        assert_eq!(customer.status, ServiceStatus::Inactive);
        assert!(customer.balance.is_zero());
        assert!(!customer.has_debt());
        assert_eq!(customer.overdue_days, 0);
        assert!(customer.due_date.is_none());
        assert_eq!(customer.data_usage_mb, 0.0);
    }

    #[test]
    fn test_apply_overdue_summary() {
        let mut customer = sample_customer();
        let due = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();

        customer.apply_overdue_summary(OverdueSummary {
            amount_overdue: Money::new(dec!(199), Currency::USD),
            overdue_days: 6,
            due_date: Some(due),
        });

        assert!(customer.has_debt());
        assert_eq!(customer.overdue_days, 6);
        assert_eq!(customer.due_date, Some(due));
    }

    #[test]
    fn test_cleared_summary_resets_everything() {
        let mut customer = sample_customer();
        customer.apply_overdue_summary(OverdueSummary {
            amount_overdue: Money::new(dec!(50), Currency::USD),
            overdue_days: 3,
            due_date: NaiveDate::from_ymd_opt(2025, 4, 1),
        });

        customer.apply_overdue_summary(OverdueSummary::cleared(Currency::USD));

        assert!(!customer.has_debt());
        assert_eq!(customer.overdue_days, 0);
        assert!(customer.due_date.is_none());
    }

    #[test]
    fn test_status_names() {
        assert_eq!(ServiceStatus::Throttled.as_str(), "THROTTLED");
        assert_eq!(ServiceStatus::Blocked.as_str(), "BLOCKED");
    }
}
