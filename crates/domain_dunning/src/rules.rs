//! Ordered rule evaluation
//!
//! A [`RuleSet`] holds the active rules in deterministic evaluation
//! order: ascending priority, ties broken by the tighter (higher)
//! minimum overdue age, then by name. The first matching rule wins and
//! evaluation stops; no customer receives two actions in one cycle.

use domain_ledger::{Customer, DunningRule};

use crate::error::DunningError;

/// Active rules in evaluation order
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<DunningRule>,
}

impl RuleSet {
    /// Builds an evaluation-ordered set from the active rules
    ///
    /// # Errors
    ///
    /// [`DunningError::NoActiveRules`] when the slice is empty; a cycle
    /// must never run against an unconfigured rule table.
    pub fn from_rules(mut rules: Vec<DunningRule>) -> Result<Self, DunningError> {
        rules.retain(|rule| rule.active);
        if rules.is_empty() {
            return Err(DunningError::NoActiveRules);
        }

        rules.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(b.min_overdue_days.cmp(&a.min_overdue_days))
                .then_with(|| a.rule_name.cmp(&b.rule_name))
        });

        Ok(Self { rules })
    }

    /// The first rule that matches the customer, if any
    pub fn first_match(&self, customer: &Customer) -> Option<&DunningRule> {
        self.rules.iter().find(|rule| rule.matches(customer))
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[DunningRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
