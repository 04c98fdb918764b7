//! Usage metering
//!
//! Meters data consumption for active prepaid customers and throttles
//! anyone who crosses the sum of their active plans' data caps. Reaching
//! the cap exactly is still within allowance; only strictly exceeding it
//! throttles.

use std::sync::Arc;

use domain_ledger::{
    Customer, CustomerCommit, CustomerSegment, CycleReport, LedgerStore, Plan, ServiceStatus,
    Subscription,
};

use crate::error::BillingError;

/// Default metering increment per tick, in megabytes
pub const DEFAULT_USAGE_INCREMENT_MB: f64 = 100.0;

/// Outcome of metering one customer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageTick {
    /// Cumulative usage after the increment
    pub new_usage_mb: f64,
    /// Total allowance across active plans
    pub limit_mb: f64,
    /// Whether the customer crossed the allowance and must be throttled
    pub throttle: bool,
}

/// Computes the usage increment for one customer, if they are metered
///
/// Only active prepaid customers with at least one capped active plan are
/// metered; everyone else returns `None`. Unlimited plans contribute no
/// allowance, and a customer whose active plans are all unlimited is not
/// metered at all.
pub fn meter_usage(
    customer: &Customer,
    subscriptions: &[(Subscription, Plan)],
    increment_mb: f64,
) -> Option<UsageTick> {
    if customer.segment != CustomerSegment::Prepaid || customer.status != ServiceStatus::Active {
        return None;
    }

    let limit_mb: f64 = subscriptions
        .iter()
        .filter(|(sub, _)| sub.is_active())
        .map(|(_, plan)| plan.data_limit_mb)
        .sum();

    if limit_mb == 0.0 {
        return None;
    }

    let new_usage_mb = customer.data_usage_mb + increment_mb;

    Some(UsageTick {
        new_usage_mb,
        limit_mb,
        throttle: new_usage_mb > limit_mb,
    })
}

/// Batch job that advances metered usage for the prepaid population
pub struct UsageMeter {
    store: Arc<dyn LedgerStore>,
    increment_mb: f64,
}

impl UsageMeter {
    /// Creates a meter with the default increment
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            increment_mb: DEFAULT_USAGE_INCREMENT_MB,
        }
    }

    /// Overrides the per-tick increment
    pub fn with_increment_mb(mut self, increment_mb: f64) -> Self {
        self.increment_mb = increment_mb;
        self
    }

    /// Advances usage for every metered customer
    pub async fn run(&self) -> Result<CycleReport, BillingError> {
        let customers = self
            .store
            .customers_by_segment(CustomerSegment::Prepaid)
            .await?;
        let mut report = CycleReport::default();

        tracing::info!(candidates = customers.len(), "Simulating data usage");

        for customer in customers {
            report.saw();
            let customer_id = customer.id;

            match self.meter_customer(customer_id).await {
                Ok(true) => report.committed(),
                Ok(false) => {}
                Err(error) => {
                    report.skipped();
                    tracing::warn!(%customer_id, %error, "Skipping customer in usage metering");
                }
            }
        }

        Ok(report)
    }

    async fn meter_customer(
        &self,
        customer_id: core_kernel::CustomerId,
    ) -> Result<bool, BillingError> {
        let snapshot = self.store.load_customer(customer_id).await?;
        let subscriptions = self.store.subscriptions_for_customer(customer_id).await?;

        let mut paired = Vec::with_capacity(subscriptions.len());
        for subscription in subscriptions {
            let plan = self.store.plan(subscription.plan_id).await?;
            paired.push((subscription, plan));
        }

        let Some(tick) = meter_usage(&snapshot.customer, &paired, self.increment_mb) else {
            return Ok(false);
        };

        tracing::info!(
            email = %snapshot.customer.email,
            usage_mb = tick.new_usage_mb,
            limit_mb = tick.limit_mb,
            "Metered usage"
        );

        let mut commit = CustomerCommit::from_snapshot(snapshot);
        commit.customer.data_usage_mb = tick.new_usage_mb;
        if tick.throttle {
            commit.customer.transition(ServiceStatus::Throttled);
            tracing::info!(
                %customer_id,
                "Customer hit data limit, status set to THROTTLED"
            );
        }

        self.store.commit_customer(commit).await?;
        Ok(true)
    }
}
