//! Subscription lifecycle
//!
//! Subscribing and canceling are the only operations that move a
//! customer between Inactive and Active. Ownership is checked by id: a
//! customer may only cancel their own subscription, and the violation is
//! a permission error, not a not-found.

use std::sync::Arc;

use core_kernel::{Clock, CustomerId, PlanId, SubscriptionId};
use domain_ledger::{
    CustomerCommit, CustomerSegment, LedgerStore, Payment, ServiceStatus, Subscription,
};

use crate::error::CuringError;

/// Subscribe and cancel operations over the plan catalog
pub struct SubscriptionLifecycle {
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
}

impl SubscriptionLifecycle {
    /// Creates a lifecycle service over the given store and clock
    pub fn new(store: Arc<dyn LedgerStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Enrolls the customer in a plan
    ///
    /// The plan must be sold to the customer's segment. A prepaid
    /// customer pays the plan price from their wallet up front, recorded
    /// as a top-up purchase; postpaid customers are billed in arrears by
    /// invoice issuance. Either way the customer's service activates.
    ///
    /// # Errors
    ///
    /// [`CuringError::SegmentMismatch`] for a cross-segment plan, and
    /// [`CuringError::InsufficientFunds`] when a prepaid wallet cannot
    /// cover the price.
    pub async fn subscribe(
        &self,
        customer_id: CustomerId,
        plan_id: PlanId,
        source: &str,
    ) -> Result<Subscription, CuringError> {
        let snapshot = self.store.load_customer(customer_id).await?;
        let plan = self.store.plan(plan_id).await?;

        if plan.segment != snapshot.customer.segment {
            return Err(CuringError::SegmentMismatch);
        }

        let mut commit = CustomerCommit::from_snapshot(snapshot);

        if commit.customer.segment == CustomerSegment::Prepaid {
            if commit.customer.balance < plan.price {
                return Err(CuringError::InsufficientFunds {
                    available: commit.customer.balance,
                    required: plan.price,
                });
            }
            commit.customer.balance = commit.customer.balance.deduct(&plan.price)?;
            commit.record_payment(Payment::top_up(customer_id, plan.price, source)?);
        }

        let subscription = Subscription::new(customer_id, plan_id, self.clock.today());
        commit.create_subscription(subscription.clone());
        commit.customer.transition(ServiceStatus::Active);

        self.store.commit_customer(commit).await?;

        tracing::info!(
            %customer_id,
            %plan_id,
            subscription_id = %subscription.id,
            plan = %plan.name,
            "Subscribed to plan"
        );
        Ok(subscription)
    }

    /// Cancels one of the customer's subscriptions
    ///
    /// A customer whose last active subscription is canceled drops to
    /// Inactive.
    ///
    /// # Errors
    ///
    /// [`CuringError::NotOwned`] when the subscription belongs to a
    /// different customer.
    pub async fn cancel(
        &self,
        customer_id: CustomerId,
        subscription_id: SubscriptionId,
    ) -> Result<(), CuringError> {
        let snapshot = self.store.load_customer(customer_id).await?;
        let mut subscription = self.store.subscription(subscription_id).await?;

        if subscription.customer_id != customer_id {
            return Err(CuringError::NotOwned {
                subscription: subscription_id,
                customer: customer_id,
            });
        }

        subscription.cancel();

        let others_active = self
            .store
            .subscriptions_for_customer(customer_id)
            .await?
            .iter()
            .any(|sub| sub.id != subscription_id && sub.is_active());

        let mut commit = CustomerCommit::from_snapshot(snapshot);
        commit.update_subscription(subscription);
        if !others_active {
            commit.customer.transition(ServiceStatus::Inactive);
        }

        self.store.commit_customer(commit).await?;

        tracing::info!(
            %customer_id,
            %subscription_id,
            deactivated = !others_active,
            "Subscription canceled"
        );
        Ok(())
    }
}
