//! Curing engine errors

use thiserror::Error;

use core_kernel::{CustomerId, Money, MoneyError, SubscriptionId};
use domain_ledger::{LedgerError, StoreError};

/// Errors raised by settlement and lifecycle operations
#[derive(Debug, Error)]
pub enum CuringError {
    /// The wallet cannot cover the amount being settled or purchased
    #[error("Insufficient balance: has {available}, needs {required}")]
    InsufficientFunds { available: Money, required: Money },

    /// The plan is not sold to the customer's segment
    #[error("This plan is not available for the customer's account type")]
    SegmentMismatch,

    /// The subscription belongs to a different customer
    #[error("Subscription {subscription} does not belong to customer {customer}")]
    NotOwned {
        subscription: SubscriptionId,
        customer: CustomerId,
    },

    /// Store access or commit failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Entity validation failure
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Money arithmetic failure
    #[error(transparent)]
    Money(#[from] MoneyError),
}
