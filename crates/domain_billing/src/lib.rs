//! Billing Domain - Invoice issuance, overdue recomputation, usage metering
//!
//! Three batch engines over the ledger store:
//!
//! - [`InvoiceIssuer`] issues one invoice per postpaid customer per
//!   billing period, guarded by the period key.
//! - [`BillingCycleProcessor`] recomputes every customer's overdue
//!   summary from their unpaid invoices and promotes past-due issued
//!   invoices to overdue.
//! - [`UsageMeter`] advances metered data usage for prepaid customers
//!   and throttles anyone over their allowance.
//!
//! Each engine's decision logic is a pure function over a customer
//! snapshot; the engine itself only loads, decides, and commits.

pub mod cycle;
pub mod error;
pub mod issuer;
pub mod usage;

pub use cycle::{assess_overdue, BillingCycleProcessor, CycleAssessment};
pub use error::BillingError;
pub use issuer::{plan_invoice, InvoiceIssuer, DEFAULT_DUE_DAYS};
pub use usage::{meter_usage, UsageMeter, UsageTick, DEFAULT_USAGE_INCREMENT_MB};
