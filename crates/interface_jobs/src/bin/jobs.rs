//! Dunning Jobs - Batch runner binary
//!
//! Seeds the in-memory store with the demo catalog and runs one pass of
//! every batch job in scheduler order.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin dunning-jobs
//!
//! # Run with environment variables
//! JOBS_USAGE_INCREMENT_MB=250 JOBS_LOG_LEVEL=debug cargo run --bin dunning-jobs
//! ```
//!
//! # Environment Variables
//!
//! * `JOBS_USAGE_INCREMENT_MB` - MB added per usage tick (default: 100)
//! * `JOBS_INVOICE_DUE_DAYS` - Days until an issued invoice is due (default: 10)
//! * `JOBS_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use std::sync::Arc;

use core_kernel::SystemClock;
use infra_mem::{MemoryLedger, TracingNotifier};
use interface_jobs::{seed_demo_data, JobRunner, JobsConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = JobsConfig::from_env().unwrap_or_default();
    init_tracing(&config.log_level);

    tracing::info!(
        usage_increment_mb = config.usage_increment_mb,
        invoice_due_days = config.invoice_due_days,
        "Starting dunning batch jobs"
    );

    let store = Arc::new(MemoryLedger::new());
    seed_demo_data(store.as_ref()).await?;

    let runner = JobRunner::new(
        store,
        Arc::new(SystemClock),
        Arc::new(TracingNotifier::new()),
        &config,
    );

    let issued = runner.run_invoice_issuance().await?;
    tracing::info!(issued = issued.changed, failed = issued.failed, "Invoice issuance done");

    let cycle = runner.run_billing_cycle_update().await?;
    tracing::info!(changed = cycle.changed, failed = cycle.failed, "Billing cycle update done");

    let usage = runner.run_usage_simulation().await?;
    tracing::info!(metered = usage.changed, failed = usage.failed, "Usage simulation done");

    let dunning = runner.run_dunning_cycle().await?;
    tracing::info!(actioned = dunning.changed, failed = dunning.failed, "Dunning cycle done");

    Ok(())
}

/// Initializes the tracing subscriber for structured logging
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
