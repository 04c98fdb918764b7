//! In-memory infrastructure adapters
//!
//! [`MemoryLedger`] implements the ledger store port over mutex-guarded
//! maps with real optimistic versioning, and [`TracingNotifier`] routes
//! customer notifications to the log stream. Both back the batch jobs
//! binary and every integration test.

pub mod memory;
pub mod notify;

pub use memory::MemoryLedger;
pub use notify::TracingNotifier;
