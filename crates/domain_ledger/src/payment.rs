//! Payment records
//!
//! A payment is an immutable proof of money movement: either an external
//! wallet top-up or an internal balance transfer that settles invoices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, Money, PaymentId};

use crate::error::LedgerError;

/// What a payment represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentKind {
    /// External funds added to the wallet
    TopUp,
    /// Wallet balance applied to open invoices
    InvoicePayment,
}

/// An immutable payment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Paying customer
    pub customer_id: CustomerId,
    /// Amount moved, always positive
    pub amount: Money,
    /// Origin tag: portal, support agent id, admin id
    pub source: String,
    /// Kind of movement
    pub kind: PaymentKind,
    /// When the payment was recorded
    pub recorded_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a payment record
    ///
    /// # Errors
    ///
    /// Rejects non-positive amounts.
    pub fn new(
        customer_id: CustomerId,
        amount: Money,
        kind: PaymentKind,
        source: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount(amount.amount()));
        }

        Ok(Self {
            id: PaymentId::new_v7(),
            customer_id,
            amount,
            source: source.into(),
            kind,
            recorded_at: Utc::now(),
        })
    }

    /// Convenience constructor for wallet top-ups
    pub fn top_up(
        customer_id: CustomerId,
        amount: Money,
        source: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        Self::new(customer_id, amount, PaymentKind::TopUp, source)
    }

    /// Convenience constructor for internal invoice settlements
    pub fn invoice_payment(
        customer_id: CustomerId,
        amount: Money,
        source: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        Self::new(customer_id, amount, PaymentKind::InvoicePayment, source)
    }
}
