//! In-memory ledger store
//!
//! Backs the batch jobs and tests. All state sits behind one mutex, and
//! every customer row carries a version counter: a commit built from a
//! stale read is rejected whole with a version conflict, exactly like
//! the durable adapters behave.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use core_kernel::{CustomerId, InvoiceId, PlanId, RuleId, SubscriptionId};
use domain_ledger::{
    BillingPeriod, Customer, CustomerCommit, CustomerSegment, DunningEventLog, DunningRule,
    Invoice, InvoiceStatus, LedgerStore, Payment, Plan, Subscription, StoreError,
    VersionedCustomer,
};

#[derive(Default)]
struct Inner {
    customers: HashMap<CustomerId, Customer>,
    versions: HashMap<CustomerId, u64>,
    invoices: HashMap<InvoiceId, Invoice>,
    payments: Vec<Payment>,
    plans: HashMap<PlanId, Plan>,
    subscriptions: HashMap<SubscriptionId, Subscription>,
    rules: HashMap<RuleId, DunningRule>,
    events: Vec<DunningEventLog>,
}

/// Thread-safe in-memory [`LedgerStore`]
#[derive(Default)]
pub struct MemoryLedger {
    inner: Mutex<Inner>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Internal("store mutex poisoned".into()))
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn insert_customer(&self, customer: Customer) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.customers.contains_key(&customer.id) {
            return Err(StoreError::Conflict(format!(
                "customer {} already exists",
                customer.id
            )));
        }
        inner.versions.insert(customer.id, 0);
        inner.customers.insert(customer.id, customer);
        Ok(())
    }

    async fn load_customer(&self, id: CustomerId) -> Result<VersionedCustomer, StoreError> {
        let inner = self.lock()?;
        let customer = inner
            .customers
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Customer", id))?;
        let version = inner.versions.get(&id).copied().unwrap_or(0);
        Ok(VersionedCustomer { customer, version })
    }

    async fn customers(&self) -> Result<Vec<Customer>, StoreError> {
        let inner = self.lock()?;
        let mut all: Vec<Customer> = inner.customers.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn customers_by_segment(
        &self,
        segment: CustomerSegment,
    ) -> Result<Vec<Customer>, StoreError> {
        let inner = self.lock()?;
        let mut matching: Vec<Customer> = inner
            .customers
            .values()
            .filter(|c| c.segment == segment)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matching)
    }

    async fn commit_customer(&self, commit: CustomerCommit) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let id = commit.customer.id;

        if !inner.customers.contains_key(&id) {
            return Err(StoreError::not_found("Customer", id));
        }
        let actual = inner.versions.get(&id).copied().unwrap_or(0);
        if actual != commit.expected_version {
            return Err(StoreError::VersionConflict {
                customer: id,
                expected: commit.expected_version,
                actual,
            });
        }

        // Validate before touching anything so a rejected commit leaves
        // the store untouched.
        for invoice in &commit.invoice_updates {
            if !inner.invoices.contains_key(&invoice.id) {
                return Err(StoreError::not_found("Invoice", invoice.id));
            }
        }
        for invoice in &commit.new_invoices {
            if inner.invoices.contains_key(&invoice.id) {
                return Err(StoreError::Conflict(format!(
                    "invoice {} already exists",
                    invoice.id
                )));
            }
        }
        for subscription in &commit.subscription_updates {
            if !inner.subscriptions.contains_key(&subscription.id) {
                return Err(StoreError::not_found("Subscription", subscription.id));
            }
        }

        inner.customers.insert(id, commit.customer);
        inner.versions.insert(id, actual + 1);
        for invoice in commit.invoice_updates {
            inner.invoices.insert(invoice.id, invoice);
        }
        for invoice in commit.new_invoices {
            inner.invoices.insert(invoice.id, invoice);
        }
        inner.payments.extend(commit.new_payments);
        for subscription in commit.subscription_updates {
            inner.subscriptions.insert(subscription.id, subscription);
        }
        for subscription in commit.new_subscriptions {
            inner.subscriptions.insert(subscription.id, subscription);
        }
        inner.events.extend(commit.events);
        Ok(())
    }

    async fn invoice(&self, id: InvoiceId) -> Result<Invoice, StoreError> {
        let inner = self.lock()?;
        inner
            .invoices
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Invoice", id))
    }

    async fn unpaid_invoices(&self, customer: CustomerId) -> Result<Vec<Invoice>, StoreError> {
        let inner = self.lock()?;
        let mut unpaid: Vec<Invoice> = inner
            .invoices
            .values()
            .filter(|inv| inv.customer_id == customer && inv.is_unpaid())
            .cloned()
            .collect();
        unpaid.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        Ok(unpaid)
    }

    async fn invoices_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<Invoice>, StoreError> {
        let inner = self.lock()?;
        let mut all: Vec<Invoice> = inner
            .invoices
            .values()
            .filter(|inv| inv.customer_id == customer)
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn has_invoice_for_period(
        &self,
        customer: CustomerId,
        period: BillingPeriod,
    ) -> Result<bool, StoreError> {
        let inner = self.lock()?;
        Ok(inner.invoices.values().any(|inv| {
            inv.customer_id == customer
                && inv.period == period
                && inv.status != InvoiceStatus::Void
        }))
    }

    async fn insert_plan(&self, plan: Plan) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.plans.values().any(|p| p.name == plan.name) {
            return Err(StoreError::Conflict(format!(
                "plan named {:?} already exists",
                plan.name
            )));
        }
        inner.plans.insert(plan.id, plan);
        Ok(())
    }

    async fn plan(&self, id: PlanId) -> Result<Plan, StoreError> {
        let inner = self.lock()?;
        inner
            .plans
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Plan", id))
    }

    async fn subscription(&self, id: SubscriptionId) -> Result<Subscription, StoreError> {
        let inner = self.lock()?;
        inner
            .subscriptions
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Subscription", id))
    }

    async fn subscriptions_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<Subscription>, StoreError> {
        let inner = self.lock()?;
        let mut subs: Vec<Subscription> = inner
            .subscriptions
            .values()
            .filter(|sub| sub.customer_id == customer)
            .cloned()
            .collect();
        subs.sort_by(|a, b| a.activated_on.cmp(&b.activated_on));
        Ok(subs)
    }

    async fn insert_rule(&self, rule: DunningRule) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.rules.insert(rule.id, rule);
        Ok(())
    }

    async fn rule(&self, id: RuleId) -> Result<DunningRule, StoreError> {
        let inner = self.lock()?;
        inner
            .rules
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("DunningRule", id))
    }

    async fn active_rules(&self) -> Result<Vec<DunningRule>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .rules
            .values()
            .filter(|rule| rule.active)
            .cloned()
            .collect())
    }

    async fn payments_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<Payment>, StoreError> {
        let inner = self.lock()?;
        let mut payments: Vec<Payment> = inner
            .payments
            .iter()
            .filter(|payment| payment.customer_id == customer)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(payments)
    }

    async fn record_event(&self, event: DunningEventLog) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.events.push(event);
        Ok(())
    }

    async fn events_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<DunningEventLog>, StoreError> {
        let inner = self.lock()?;
        let mut events: Vec<DunningEventLog> = inner
            .events
            .iter()
            .filter(|event| event.customer_id == customer)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(events)
    }

    async fn recent_events(&self) -> Result<Vec<DunningEventLog>, StoreError> {
        let inner = self.lock()?;
        let mut events = inner.events.clone();
        events.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(events)
    }
}
