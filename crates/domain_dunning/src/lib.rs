//! Dunning Domain - Rule evaluation and enforcement
//!
//! The [`DunningEngine`] scans customers with aged debt, picks the first
//! matching rule from a deterministically ordered [`RuleSet`], and
//! applies the rule's action through a closed action-to-effect table.
//! Status transitions, their audit entries, and customer notifications
//! all originate here; nothing else in the system degrades service.

pub mod engine;
pub mod error;
pub mod rules;

pub use engine::{plan_action, DunningEngine, PlannedAction, TRIGGERED_BY};
pub use error::DunningError;
pub use rules::RuleSet;
