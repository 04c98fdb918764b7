//! Ledger Domain - Entity model and store ports
//!
//! This crate defines the billing entities shared by every engine
//! (customers, invoices, payments, plans, subscriptions, dunning rules,
//! and the append-only event log) together with the `LedgerStore` and
//! `NotificationSink` ports the engines are written against.
//!
//! Ownership is one-directional: dependent entities hold a `CustomerId`,
//! and back-lookup goes through store queries. There are no object
//! cycles anywhere in the model.

pub mod audit;
pub mod customer;
pub mod error;
pub mod invoice;
pub mod payment;
pub mod ports;
pub mod report;
pub mod rule;
pub mod subscription;

pub use audit::DunningEventLog;
pub use customer::{Customer, CustomerSegment, OverdueSummary, ServiceStatus};
pub use error::LedgerError;
pub use invoice::{BillingPeriod, Invoice, InvoiceLineItem, InvoiceStatus};
pub use payment::{Payment, PaymentKind};
pub use ports::{
    CustomerCommit, LedgerStore, NotificationSink, StoreError, VersionedCustomer,
};
pub use report::CycleReport;
pub use rule::{DunningAction, DunningRule, SegmentFilter};
pub use subscription::{Plan, ServiceType, Subscription, SubscriptionStatus};
