//! Dunning engine errors

use thiserror::Error;

use domain_ledger::StoreError;

/// Errors raised by the dunning engine
#[derive(Debug, Error)]
pub enum DunningError {
    /// A cycle was started with no active rules configured
    #[error("No active dunning rules found; cycle aborted")]
    NoActiveRules,

    /// Store access or commit failure
    #[error(transparent)]
    Store(#[from] StoreError),
}
