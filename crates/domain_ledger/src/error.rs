//! Ledger domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::MoneyError;

/// Errors raised by entity construction and validation
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An amount that must be positive was zero or negative
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// A dunning rule with max below min
    #[error("Invalid rule range: min {min} exceeds max {max}")]
    InvalidRuleRange { min: u32, max: u32 },

    /// Money arithmetic failure
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Other validation failure
    #[error("Validation error: {0}")]
    Validation(String),
}
