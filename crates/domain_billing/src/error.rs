//! Billing engine errors

use thiserror::Error;

use domain_ledger::{LedgerError, StoreError};

/// Errors raised by the billing engines
#[derive(Debug, Error)]
pub enum BillingError {
    /// Store access or commit failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Entity validation failure
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
