//! Jobs Interface - Scheduler-facing wiring
//!
//! Assembles the billing, dunning, and curing engines over a store and
//! exposes them as discrete batch jobs, plus demo seeding for local runs.
//! This crate owns configuration and process-level concerns; all domain
//! behavior lives in the engine crates.

pub mod config;
pub mod runner;
pub mod seed;

pub use config::JobsConfig;
pub use runner::{JobError, JobRunner, TRIGGERED_BY};
pub use seed::seed_demo_data;
