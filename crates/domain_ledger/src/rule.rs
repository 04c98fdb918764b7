//! Dunning rule configuration
//!
//! A rule maps an overdue-age band and a segment filter to a punitive or
//! notify action. Priority is explicit: evaluation order never depends on
//! the order the store happens to return rules in.

use serde::{Deserialize, Serialize};

use core_kernel::RuleId;

use crate::customer::{Customer, CustomerSegment};
use crate::error::LedgerError;

/// Action a matched rule takes against a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DunningAction {
    SendSms,
    SendEmail,
    NotifyThrottle,
    ThrottleData,
    BlockVoice,
    BlockAllServices,
}

/// Which customers a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentFilter {
    All,
    Prepaid,
    Postpaid,
}

impl SegmentFilter {
    /// Returns true when the filter admits the given segment
    pub fn admits(&self, segment: CustomerSegment) -> bool {
        match self {
            SegmentFilter::All => true,
            SegmentFilter::Prepaid => segment == CustomerSegment::Prepaid,
            SegmentFilter::Postpaid => segment == CustomerSegment::Postpaid,
        }
    }
}

/// A configured dunning rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DunningRule {
    /// Unique identifier
    pub id: RuleId,
    /// Unique rule name
    pub rule_name: String,
    /// Evaluation priority, lower wins
    pub priority: u32,
    /// Action taken on match
    pub action: DunningAction,
    /// Segment filter
    pub target_segment: SegmentFilter,
    /// Inclusive lower bound on overdue days
    pub min_overdue_days: u32,
    /// Inclusive upper bound on overdue days
    pub max_overdue_days: u32,
    /// Whether the rule participates in cycles
    pub active: bool,
}

impl DunningRule {
    /// Creates an active rule
    ///
    /// # Errors
    ///
    /// Rejects an inverted day range.
    pub fn new(
        rule_name: impl Into<String>,
        priority: u32,
        action: DunningAction,
        target_segment: SegmentFilter,
        min_overdue_days: u32,
        max_overdue_days: u32,
    ) -> Result<Self, LedgerError> {
        if max_overdue_days < min_overdue_days {
            return Err(LedgerError::InvalidRuleRange {
                min: min_overdue_days,
                max: max_overdue_days,
            });
        }

        Ok(Self {
            id: RuleId::new_v7(),
            rule_name: rule_name.into(),
            priority,
            action,
            target_segment,
            min_overdue_days,
            max_overdue_days,
            active: true,
        })
    }

    /// Deactivates the rule
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Returns true when the rule matches the customer's segment and
    /// overdue age
    pub fn matches(&self, customer: &Customer) -> bool {
        self.target_segment.admits(customer.segment)
            && customer.overdue_days >= self.min_overdue_days
            && customer.overdue_days <= self.max_overdue_days
    }
}
