//! Scheduled job runner
//!
//! Owns the engine instances and exposes one method per batch job, in
//! the order a scheduler would fire them: invoice issuance, overdue
//! recomputation, usage simulation, dunning enforcement.

use std::sync::Arc;

use thiserror::Error;

use core_kernel::Clock;
use domain_billing::{BillingCycleProcessor, BillingError, InvoiceIssuer, UsageMeter};
use domain_dunning::{DunningEngine, DunningError};
use domain_ledger::{CycleReport, LedgerStore, NotificationSink};

use crate::config::JobsConfig;

/// Origin tag for state changes the scheduler itself initiates
pub const TRIGGERED_BY: &str = "SYSTEM_SCHEDULER";

/// Errors raised by any scheduled job
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error(transparent)]
    Dunning(#[from] DunningError),
}

/// Runs the batch jobs against one store
pub struct JobRunner {
    issuer: InvoiceIssuer,
    cycle: BillingCycleProcessor,
    meter: UsageMeter,
    dunning: DunningEngine,
}

impl JobRunner {
    /// Wires every engine to the given store, clock, and sink
    pub fn new(
        store: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn NotificationSink>,
        config: &JobsConfig,
    ) -> Self {
        Self {
            issuer: InvoiceIssuer::new(store.clone(), clock.clone())
                .with_due_days(config.invoice_due_days),
            cycle: BillingCycleProcessor::new(store.clone(), clock),
            meter: UsageMeter::new(store.clone()).with_increment_mb(config.usage_increment_mb),
            dunning: DunningEngine::new(store, notifier),
        }
    }

    /// Issues this period's invoices
    pub async fn run_invoice_issuance(&self) -> Result<CycleReport, JobError> {
        Ok(self.issuer.run().await?)
    }

    /// Recomputes overdue summaries and promotes past-due invoices
    pub async fn run_billing_cycle_update(&self) -> Result<CycleReport, JobError> {
        Ok(self.cycle.run().await?)
    }

    /// Advances simulated data usage for the prepaid population
    pub async fn run_usage_simulation(&self) -> Result<CycleReport, JobError> {
        Ok(self.meter.run().await?)
    }

    /// Enforces the dunning rules against the overdue population
    pub async fn run_dunning_cycle(&self) -> Result<CycleReport, JobError> {
        Ok(self.dunning.run().await?)
    }
}
