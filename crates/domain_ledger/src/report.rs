//! Batch cycle reporting
//!
//! Every batch engine returns one of these: how many candidates it saw,
//! how many it actually mutated, and how many failed in isolation.

use serde::{Deserialize, Serialize};

/// Outcome counts for one batch cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Candidates examined
    pub processed: usize,
    /// Customers whose state was mutated
    pub changed: usize,
    /// Customers skipped because their unit of work failed
    pub failed: usize,
}

impl CycleReport {
    /// Notes an examined candidate
    pub fn saw(&mut self) {
        self.processed += 1;
    }

    /// Notes a committed mutation
    pub fn committed(&mut self) {
        self.changed += 1;
    }

    /// Notes an isolated per-customer failure
    pub fn skipped(&mut self) {
        self.failed += 1;
    }
}
