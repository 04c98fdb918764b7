//! Invoice management
//!
//! Invoices are issued once per billing period per customer. The period
//! key is the duplicate-issuance guard: a customer never receives two
//! invoices for the same (year, month), no matter how often the issuance
//! job runs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use core_kernel::{Currency, CustomerId, InvoiceId, Money};

use crate::error::LedgerError;

/// Invoice status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Invoice is being drafted
    Draft,
    /// Invoice has been issued and awaits payment
    Issued,
    /// Fully paid
    Paid,
    /// Past due date
    Overdue,
    /// Cancelled
    Void,
}

/// The billing period an invoice covers, one per calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub year: i32,
    pub month: u32,
}

impl BillingPeriod {
    /// The period containing the given date
    pub fn containing(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// An invoice for subscription charges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Billed customer
    pub customer_id: CustomerId,
    /// Billing period covered, the duplicate-issuance key
    pub period: BillingPeriod,
    /// Issue date
    pub issue_date: NaiveDate,
    /// Due date
    pub due_date: NaiveDate,
    /// Line items
    pub items: Vec<InvoiceLineItem>,
    /// Sum of line item amounts
    pub total_amount: Money,
    /// Status
    pub status: InvoiceStatus,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a new draft invoice with no items
    pub fn new(
        customer_id: CustomerId,
        issue_date: NaiveDate,
        due_date: NaiveDate,
        currency: Currency,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: InvoiceId::new_v7(),
            customer_id,
            period: BillingPeriod::containing(issue_date),
            issue_date,
            due_date,
            items: Vec::new(),
            total_amount: Money::zero(currency),
            status: InvoiceStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds a line item and recalculates the total
    ///
    /// # Errors
    ///
    /// Rejects non-positive amounts.
    pub fn add_item(
        &mut self,
        description: impl Into<String>,
        amount: Money,
    ) -> Result<(), LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount(amount.amount()));
        }

        self.items.push(InvoiceLineItem {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
        });
        self.recalculate_total();
        Ok(())
    }

    /// Issues the invoice
    pub fn issue(&mut self) {
        self.status = InvoiceStatus::Issued;
        self.updated_at = Utc::now();
    }

    /// Marks the invoice paid
    pub fn mark_paid(&mut self) {
        self.status = InvoiceStatus::Paid;
        self.updated_at = Utc::now();
    }

    /// Promotes a past-due issued invoice to overdue
    pub fn mark_overdue(&mut self) {
        self.status = InvoiceStatus::Overdue;
        self.updated_at = Utc::now();
    }

    /// Voids the invoice
    pub fn void(&mut self) {
        self.status = InvoiceStatus::Void;
        self.updated_at = Utc::now();
    }

    /// Returns true while the invoice still counts toward debt
    pub fn is_unpaid(&self) -> bool {
        matches!(self.status, InvoiceStatus::Issued | InvoiceStatus::Overdue)
    }

    /// Returns true if an issued invoice is past its due date
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        today > self.due_date && self.is_unpaid()
    }

    fn recalculate_total(&mut self) {
        self.total_amount = self
            .items
            .iter()
            .fold(Money::zero(self.total_amount.currency()), |acc, item| {
                acc + item.amount
            });
    }
}

/// A line item on an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    /// Item ID
    pub id: Uuid,
    /// Description, typically the plan name
    pub description: String,
    /// Charged amount, always positive
    pub amount: Money,
}
