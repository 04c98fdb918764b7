//! Store and notification ports
//!
//! The engines depend only on these traits; adapters live in infra
//! crates. The contended resource is the customer row: every mutation
//! travels as a [`CustomerCommit`]: the customer tagged with the version
//! it was read at, plus the dependent records created or updated in the
//! same unit of work. The store applies a commit atomically and rejects
//! it when the version is stale, giving single-writer-at-a-time semantics
//! per customer without holding locks across a batch candidate set.

use async_trait::async_trait;
use thiserror::Error;

use core_kernel::{CustomerId, InvoiceId, PlanId, RuleId, SubscriptionId};

use crate::audit::DunningEventLog;
use crate::customer::{Customer, CustomerSegment};
use crate::invoice::{BillingPeriod, Invoice};
use crate::payment::Payment;
use crate::rule::DunningRule;
use crate::subscription::{Plan, Subscription};

/// Errors surfaced by store adapters
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: String },

    /// A commit was based on a stale read of the customer
    #[error("Version conflict on customer {customer}: expected {expected}, found {actual}")]
    VersionConflict {
        customer: CustomerId,
        expected: u64,
        actual: u64,
    },

    /// The commit violates a uniqueness constraint
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An adapter-internal failure
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Returns true for an optimistic-locking rejection
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, StoreError::VersionConflict { .. })
    }
}

/// A customer read together with its optimistic version
#[derive(Debug, Clone)]
pub struct VersionedCustomer {
    pub customer: Customer,
    pub version: u64,
}

/// One atomic unit of work against a single customer
///
/// Built by an engine from a [`VersionedCustomer`] snapshot, filled with
/// intended mutations, and handed to [`LedgerStore::commit_customer`].
/// Either everything in the unit lands, or nothing does.
#[derive(Debug, Clone)]
pub struct CustomerCommit {
    /// The mutated customer
    pub customer: Customer,
    /// The version the customer was read at
    pub expected_version: u64,
    /// Existing invoices to update, matched by id
    pub invoice_updates: Vec<Invoice>,
    /// Invoices created in this unit
    pub new_invoices: Vec<Invoice>,
    /// Payments created in this unit
    pub new_payments: Vec<Payment>,
    /// Existing subscriptions to update, matched by id
    pub subscription_updates: Vec<Subscription>,
    /// Subscriptions created in this unit
    pub new_subscriptions: Vec<Subscription>,
    /// Audit entries recorded with this unit
    pub events: Vec<DunningEventLog>,
}

impl CustomerCommit {
    /// Starts an empty commit from a versioned snapshot
    pub fn from_snapshot(snapshot: VersionedCustomer) -> Self {
        Self {
            customer: snapshot.customer,
            expected_version: snapshot.version,
            invoice_updates: Vec::new(),
            new_invoices: Vec::new(),
            new_payments: Vec::new(),
            subscription_updates: Vec::new(),
            new_subscriptions: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queues an invoice update
    pub fn update_invoice(&mut self, invoice: Invoice) -> &mut Self {
        self.invoice_updates.push(invoice);
        self
    }

    /// Queues a new invoice
    pub fn create_invoice(&mut self, invoice: Invoice) -> &mut Self {
        self.new_invoices.push(invoice);
        self
    }

    /// Queues a new payment
    pub fn record_payment(&mut self, payment: Payment) -> &mut Self {
        self.new_payments.push(payment);
        self
    }

    /// Queues a subscription update
    pub fn update_subscription(&mut self, subscription: Subscription) -> &mut Self {
        self.subscription_updates.push(subscription);
        self
    }

    /// Queues a new subscription
    pub fn create_subscription(&mut self, subscription: Subscription) -> &mut Self {
        self.new_subscriptions.push(subscription);
        self
    }

    /// Queues an audit entry
    pub fn log_event(&mut self, event: DunningEventLog) -> &mut Self {
        self.events.push(event);
        self
    }
}

/// Durable storage for all billing entities
///
/// Queries return point-in-time snapshots; writes to a customer and its
/// dependents go through [`Self::commit_customer`]. Catalog-level inserts
/// (plans, rules, new customers) are individually atomic.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    // --- customers ---

    /// Inserts a new customer
    async fn insert_customer(&self, customer: Customer) -> Result<(), StoreError>;

    /// Loads a customer with its current version
    async fn load_customer(&self, id: CustomerId) -> Result<VersionedCustomer, StoreError>;

    /// All customers, unordered
    async fn customers(&self) -> Result<Vec<Customer>, StoreError>;

    /// Customers in one segment
    async fn customers_by_segment(
        &self,
        segment: CustomerSegment,
    ) -> Result<Vec<Customer>, StoreError>;

    /// Applies one atomic per-customer unit of work
    ///
    /// # Errors
    ///
    /// [`StoreError::VersionConflict`] when the customer changed since
    /// the snapshot the commit was built from; nothing is applied.
    async fn commit_customer(&self, commit: CustomerCommit) -> Result<(), StoreError>;

    // --- invoices ---

    /// Loads one invoice
    async fn invoice(&self, id: InvoiceId) -> Result<Invoice, StoreError>;

    /// A customer's unpaid (issued or overdue) invoices
    async fn unpaid_invoices(&self, customer: CustomerId) -> Result<Vec<Invoice>, StoreError>;

    /// All of a customer's invoices, newest first
    async fn invoices_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<Invoice>, StoreError>;

    /// Returns true when a non-void invoice exists for the period
    async fn has_invoice_for_period(
        &self,
        customer: CustomerId,
        period: BillingPeriod,
    ) -> Result<bool, StoreError>;

    // --- plans & subscriptions ---

    /// Inserts a plan into the catalog
    async fn insert_plan(&self, plan: Plan) -> Result<(), StoreError>;

    /// Loads one plan
    async fn plan(&self, id: PlanId) -> Result<Plan, StoreError>;

    /// Loads one subscription
    async fn subscription(&self, id: SubscriptionId) -> Result<Subscription, StoreError>;

    /// A customer's subscriptions, any status
    async fn subscriptions_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<Subscription>, StoreError>;

    // --- rules ---

    /// Inserts a dunning rule
    async fn insert_rule(&self, rule: DunningRule) -> Result<(), StoreError>;

    /// Loads one rule
    async fn rule(&self, id: RuleId) -> Result<DunningRule, StoreError>;

    /// All rules with the active flag set
    async fn active_rules(&self) -> Result<Vec<DunningRule>, StoreError>;

    // --- payments & audit ---

    /// A customer's payments, newest first
    async fn payments_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<Payment>, StoreError>;

    /// Records a standalone audit entry outside any customer commit
    async fn record_event(&self, event: DunningEventLog) -> Result<(), StoreError>;

    /// A customer's audit entries, newest first
    async fn events_for_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<DunningEventLog>, StoreError>;

    /// All audit entries, newest first
    async fn recent_events(&self) -> Result<Vec<DunningEventLog>, StoreError>;
}

/// Best-effort delivery of a human-readable message to a customer
///
/// Fire-and-forget by contract: implementations swallow delivery
/// failures and must never block or roll back the owning transaction.
pub trait NotificationSink: Send + Sync {
    /// Sends a message; no delivery guarantee, no return value
    fn notify(&self, customer: &Customer, message: &str);
}
