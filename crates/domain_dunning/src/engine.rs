//! Dunning engine
//!
//! Scans the overdue population each cycle, evaluates the rule set, and
//! applies the matched rule's action. The action-to-effect mapping is a
//! closed table in [`plan_action`]: a rule can never demand an effect the
//! engine does not know.
//!
//! Already-blocked customers are out of scope; only curing releases a
//! block.

use std::sync::Arc;

use domain_ledger::{
    Customer, CustomerCommit, CycleReport, DunningAction, DunningEventLog, DunningRule,
    LedgerStore, NotificationSink, ServiceStatus,
};

use crate::error::DunningError;
use crate::rules::RuleSet;

/// Origin tag stamped on every audit entry the engine writes
pub const TRIGGERED_BY: &str = "DUNNING_ENGINE";

/// The intended effect of applying one rule to one customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAction {
    /// The action taken
    pub action: DunningAction,
    /// Status transition, when the action degrades service
    pub new_status: Option<ServiceStatus>,
    /// Message delivered to the customer
    pub notification: &'static str,
    /// Audit entry recorded with the commit
    pub audit: DunningEventLog,
}

/// Maps a matched rule onto its concrete effect for the customer
///
/// Notify-only actions never touch service status. A degrading action
/// whose target status the customer already holds degenerates into a
/// notify-only outcome, so repeated cycles do not re-record transitions.
pub fn plan_action(customer: &Customer, rule: &DunningRule) -> PlannedAction {
    let (target_status, notification) = match rule.action {
        DunningAction::NotifyThrottle => (
            None,
            "Your account is overdue. Please pay to avoid service throttling.",
        ),
        DunningAction::ThrottleData => (
            Some(ServiceStatus::Throttled),
            "Your service has been throttled due to non-payment.",
        ),
        DunningAction::BlockVoice | DunningAction::BlockAllServices => (
            Some(ServiceStatus::Blocked),
            "Your service has been blocked due to non-payment.",
        ),
        DunningAction::SendSms | DunningAction::SendEmail => (
            None,
            "This is a friendly reminder about your overdue bill.",
        ),
    };

    let new_status = target_status.filter(|status| *status != customer.status);
    let details = format!("Triggered by Rule ID: {} ({})", rule.id, rule.rule_name);

    let audit = match new_status {
        Some(status) => DunningEventLog::new(customer.id, status.as_str(), TRIGGERED_BY, details),
        None => DunningEventLog::new(customer.id, "NOTIFICATION_SENT", TRIGGERED_BY, details),
    };

    PlannedAction {
        action: rule.action,
        new_status,
        notification,
        audit,
    }
}

/// Batch engine enforcing the dunning rules
pub struct DunningEngine {
    store: Arc<dyn LedgerStore>,
    notifier: Arc<dyn NotificationSink>,
}

impl DunningEngine {
    /// Creates an engine over the given store and notification sink
    pub fn new(store: Arc<dyn LedgerStore>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { store, notifier }
    }

    /// Runs one dunning cycle
    ///
    /// # Errors
    ///
    /// [`DunningError::NoActiveRules`] before any customer is touched
    /// when the rule table has no active rows.
    pub async fn run(&self) -> Result<CycleReport, DunningError> {
        let rules = RuleSet::from_rules(self.store.active_rules().await?)?;

        let candidates: Vec<Customer> = self
            .store
            .customers()
            .await?
            .into_iter()
            .filter(|c| c.overdue_days > 0 && c.status != ServiceStatus::Blocked)
            .collect();

        tracing::info!(
            rules = rules.len(),
            candidates = candidates.len(),
            "Starting dunning cycle"
        );

        let mut report = CycleReport::default();
        for candidate in candidates {
            report.saw();
            let customer_id = candidate.id;

            match self.dun_customer(customer_id, &rules).await {
                Ok(true) => report.committed(),
                Ok(false) => {}
                Err(error) => {
                    report.skipped();
                    tracing::warn!(%customer_id, %error, "Skipping customer in dunning cycle");
                }
            }
        }

        tracing::info!(
            processed = report.processed,
            actioned = report.changed,
            failed = report.failed,
            "Dunning cycle finished"
        );
        Ok(report)
    }

    async fn dun_customer(
        &self,
        customer_id: core_kernel::CustomerId,
        rules: &RuleSet,
    ) -> Result<bool, DunningError> {
        let snapshot = self.store.load_customer(customer_id).await?;

        // Re-check against the fresh read: the summary may have been
        // cured between candidate selection and now.
        if snapshot.customer.overdue_days == 0
            || snapshot.customer.status == ServiceStatus::Blocked
        {
            return Ok(false);
        }

        let Some(rule) = rules.first_match(&snapshot.customer) else {
            return Ok(false);
        };

        let planned = plan_action(&snapshot.customer, rule);

        match planned.new_status {
            Some(status) => tracing::info!(
                %customer_id,
                action = ?planned.action,
                new_status = status.as_str(),
                "Applied dunning action"
            ),
            None => tracing::info!(
                %customer_id,
                action = ?planned.action,
                "Sent dunning notification"
            ),
        }

        let mut commit = CustomerCommit::from_snapshot(snapshot);
        if let Some(status) = planned.new_status {
            commit.customer.transition(status);
        }
        commit.log_event(planned.audit);
        let customer = commit.customer.clone();
        self.store.commit_customer(commit).await?;

        // Delivery happens after the commit lands; a lost message is
        // acceptable, a ghost transition is not.
        self.notifier.notify(&customer, planned.notification);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use domain_ledger::{CustomerSegment, SegmentFilter};

    fn overdue_customer(days: u32, status: ServiceStatus) -> Customer {
        let mut customer = Customer::new(
            "Test",
            "Customer",
            "t@example.com",
            "+1-555-0000",
            CustomerSegment::Postpaid,
            Currency::USD,
        );
        customer.overdue_days = days;
        customer.status = status;
        customer
    }

    fn rule_with(action: DunningAction) -> DunningRule {
        DunningRule::new("Rule", 1, action, SegmentFilter::All, 1, 9999).unwrap()
    }

    #[test]
    fn test_notify_actions_leave_status_alone() {
        let customer = overdue_customer(2, ServiceStatus::Active);

        for action in [
            DunningAction::SendSms,
            DunningAction::SendEmail,
            DunningAction::NotifyThrottle,
        ] {
            let planned = plan_action(&customer, &rule_with(action));
            assert!(planned.new_status.is_none());
            assert_eq!(planned.audit.action_taken, "NOTIFICATION_SENT");
        }
    }

    #[test]
    fn test_throttle_action_degrades_to_throttled() {
        let customer = overdue_customer(5, ServiceStatus::Active);
        let planned = plan_action(&customer, &rule_with(DunningAction::ThrottleData));

        assert_eq!(planned.new_status, Some(ServiceStatus::Throttled));
        assert_eq!(planned.audit.action_taken, "THROTTLED");
        assert_eq!(
            planned.notification,
            "Your service has been throttled due to non-payment."
        );
    }

    #[test]
    fn test_block_actions_degrade_to_blocked() {
        let customer = overdue_customer(10, ServiceStatus::Throttled);

        for action in [DunningAction::BlockVoice, DunningAction::BlockAllServices] {
            let planned = plan_action(&customer, &rule_with(action));
            assert_eq!(planned.new_status, Some(ServiceStatus::Blocked));
            assert_eq!(planned.audit.action_taken, "BLOCKED");
        }
    }

    #[test]
    fn test_already_throttled_customer_gets_notification_only() {
        let customer = overdue_customer(5, ServiceStatus::Throttled);
        let planned = plan_action(&customer, &rule_with(DunningAction::ThrottleData));

        assert!(planned.new_status.is_none());
        assert_eq!(planned.audit.action_taken, "NOTIFICATION_SENT");
    }

    #[test]
    fn test_audit_details_name_the_rule() {
        let customer = overdue_customer(5, ServiceStatus::Active);
        let rule = rule_with(DunningAction::ThrottleData);
        let planned = plan_action(&customer, &rule);

        assert_eq!(planned.audit.triggered_by, TRIGGERED_BY);
        assert_eq!(
            planned.audit.details,
            format!("Triggered by Rule ID: {} ({})", rule.id, rule.rule_name)
        );
    }
}
