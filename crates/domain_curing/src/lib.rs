//! Curing Domain - Settlement, restoration, and subscription lifecycle
//!
//! The interactive counterpart to the dunning engine. [`CuringService`]
//! settles debt from the wallet and restores degraded service;
//! [`SubscriptionLifecycle`] enrolls customers in plans and cancels
//! subscriptions. Every mutation is one per-customer commit, so a cure
//! racing a dunning cycle resolves through version conflict, never
//! through interleaved half-updates.

pub mod error;
pub mod lifecycle;
pub mod settlement;

pub use error::CuringError;
pub use lifecycle::SubscriptionLifecycle;
pub use settlement::{plan_settlement, CuringService, Settlement};
