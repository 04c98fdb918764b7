//! Core Kernel - Foundational types and utilities for the dunning-curing system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed entity identifiers
//! - Clock abstractions for deterministic batch cycles

pub mod clock;
pub mod error;
pub mod identifiers;
pub mod money;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::CoreError;
pub use identifiers::{
    CustomerId, EventLogId, InvoiceId, PaymentId, PlanId, RuleId, SubscriptionId,
};
pub use money::{Currency, Money, MoneyError};
