//! Billing cycle processor
//!
//! Recomputes each customer's overdue summary from their unpaid invoices
//! and promotes past-due issued invoices to overdue. The assessment is a
//! pure function over a snapshot; the processor applies one commit per
//! customer. Running the cycle twice with unchanged invoice data yields
//! identical state.

use std::sync::Arc;

use chrono::NaiveDate;

use core_kernel::{Clock, InvoiceId, Money};
use domain_ledger::{
    Customer, CustomerCommit, CycleReport, Invoice, InvoiceStatus, LedgerStore, OverdueSummary,
};

use crate::error::BillingError;

/// Intended mutations for one customer, produced by [`assess_overdue`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleAssessment {
    /// The recomputed overdue summary
    pub summary: OverdueSummary,
    /// Issued invoices now past due, to be promoted
    pub promote_to_overdue: Vec<InvoiceId>,
}

/// Recomputes a customer's overdue position from their unpaid invoices
///
/// Returns `None` when nothing needs to change: the customer has no
/// unpaid invoices and no recorded debt, or the recomputed summary
/// matches the stored one and no invoice needs promotion. That makes
/// repeated invocation with unchanged invoice data a no-op.
pub fn assess_overdue(
    customer: &Customer,
    unpaid: &[Invoice],
    today: NaiveDate,
) -> Option<CycleAssessment> {
    let currency = customer.amount_overdue.currency();

    if unpaid.is_empty() {
        if customer.has_debt() || customer.overdue_days > 0 || customer.due_date.is_some() {
            return Some(CycleAssessment {
                summary: OverdueSummary::cleared(currency),
                promote_to_overdue: Vec::new(),
            });
        }
        return None;
    }

    let total_due: Money = unpaid
        .iter()
        .fold(Money::zero(currency), |acc, inv| acc + inv.total_amount);

    let Some(oldest_due) = unpaid.iter().map(|inv| inv.due_date).min() else {
        return None;
    };

    let overdue_days = if today > oldest_due {
        (today - oldest_due).num_days() as u32
    } else {
        0
    };

    let summary = OverdueSummary {
        amount_overdue: total_due,
        overdue_days,
        due_date: Some(oldest_due),
    };

    let promote_to_overdue: Vec<InvoiceId> = unpaid
        .iter()
        .filter(|inv| inv.status == InvoiceStatus::Issued && today > inv.due_date)
        .map(|inv| inv.id)
        .collect();

    if summary == customer.overdue_summary() && promote_to_overdue.is_empty() {
        return None;
    }

    Some(CycleAssessment {
        summary,
        promote_to_overdue,
    })
}

/// Batch job that refreshes overdue summaries for all customers
pub struct BillingCycleProcessor {
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
}

impl BillingCycleProcessor {
    /// Creates a processor over the given store and clock
    pub fn new(store: Arc<dyn LedgerStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Runs one full cycle
    ///
    /// Each customer's recomputation commits independently; a failure is
    /// logged and counted, never allowed to abort the rest of the run.
    pub async fn run(&self) -> Result<CycleReport, BillingError> {
        let today = self.clock.today();
        let customers = self.store.customers().await?;
        let mut report = CycleReport::default();

        tracing::info!(customers = customers.len(), "Starting billing cycle update");

        for customer in customers {
            report.saw();
            let customer_id = customer.id;

            match self.refresh_customer(customer_id, today).await {
                Ok(true) => report.committed(),
                Ok(false) => {}
                Err(error) => {
                    report.skipped();
                    tracing::warn!(%customer_id, %error, "Skipping customer in billing cycle");
                }
            }
        }

        tracing::info!(
            processed = report.processed,
            changed = report.changed,
            failed = report.failed,
            "Billing cycle update finished"
        );
        Ok(report)
    }

    /// Recomputes and commits one customer; returns whether state changed
    async fn refresh_customer(
        &self,
        customer_id: core_kernel::CustomerId,
        today: NaiveDate,
    ) -> Result<bool, BillingError> {
        let snapshot = self.store.load_customer(customer_id).await?;
        let unpaid = self.store.unpaid_invoices(customer_id).await?;

        let Some(assessment) = assess_overdue(&snapshot.customer, &unpaid, today) else {
            return Ok(false);
        };

        let mut commit = CustomerCommit::from_snapshot(snapshot);
        commit.customer.apply_overdue_summary(assessment.summary);

        for mut invoice in unpaid
            .into_iter()
            .filter(|inv| assessment.promote_to_overdue.contains(&inv.id))
        {
            invoice.mark_overdue();
            tracing::info!(invoice_id = %invoice.id, "Invoice is now OVERDUE");
            commit.update_invoice(invoice);
        }

        self.store.commit_customer(commit).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{Currency, CustomerId};
    use domain_ledger::CustomerSegment;
    use rust_decimal_macros::dec;

    fn customer() -> Customer {
        Customer::new(
            "Maya",
            "Iyer",
            "maya@example.com",
            "+1-555-0101",
            CustomerSegment::Postpaid,
            Currency::USD,
        )
    }

    fn unpaid_invoice(
        customer_id: CustomerId,
        due: NaiveDate,
        amount: Money,
        status: InvoiceStatus,
    ) -> Invoice {
        let issue = due - chrono::Days::new(10);
        let mut invoice = Invoice::new(customer_id, issue, due, Currency::USD);
        invoice.add_item("Plan charge", amount).unwrap();
        invoice.issue();
        if status == InvoiceStatus::Overdue {
            invoice.mark_overdue();
        }
        invoice
    }

    #[test]
    fn test_no_invoices_no_debt_is_noop() {
        let customer = customer();
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();

        assert!(assess_overdue(&customer, &[], today).is_none());
    }

    #[test]
    fn test_no_invoices_with_stale_debt_clears() {
        let mut customer = customer();
        customer.apply_overdue_summary(OverdueSummary {
            amount_overdue: Money::new(dec!(199), Currency::USD),
            overdue_days: 4,
            due_date: NaiveDate::from_ymd_opt(2025, 3, 28),
        });
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();

        let assessment = assess_overdue(&customer, &[], today).unwrap();
        assert!(assessment.summary.amount_overdue.is_zero());
        assert_eq!(assessment.summary.overdue_days, 0);
        assert!(assessment.summary.due_date.is_none());
    }

    #[test]
    fn test_summary_sums_unpaid_totals_and_ages_from_oldest() {
        let customer = customer();
        let today = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
        let older_due = NaiveDate::from_ymd_opt(2025, 4, 4).unwrap();
        let newer_due = NaiveDate::from_ymd_opt(2025, 4, 8).unwrap();

        let invoices = vec![
            unpaid_invoice(
                customer.id,
                older_due,
                Money::new(dec!(120), Currency::USD),
                InvoiceStatus::Overdue,
            ),
            unpaid_invoice(
                customer.id,
                newer_due,
                Money::new(dec!(79), Currency::USD),
                InvoiceStatus::Issued,
            ),
        ];

        let assessment = assess_overdue(&customer, &invoices, today).unwrap();
        assert_eq!(assessment.summary.amount_overdue.amount(), dec!(199));
        assert_eq!(assessment.summary.overdue_days, 6);
        assert_eq!(assessment.summary.due_date, Some(older_due));
        // Only the ISSUED one gets promoted
        assert_eq!(assessment.promote_to_overdue.len(), 1);
        assert_eq!(assessment.promote_to_overdue[0], invoices[1].id);
    }

    #[test]
    fn test_not_yet_due_means_zero_overdue_days() {
        let customer = customer();
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let due = NaiveDate::from_ymd_opt(2025, 4, 9).unwrap();

        let invoices = vec![unpaid_invoice(
            customer.id,
            due,
            Money::new(dec!(50), Currency::USD),
            InvoiceStatus::Issued,
        )];

        let assessment = assess_overdue(&customer, &invoices, today).unwrap();
        assert_eq!(assessment.summary.overdue_days, 0);
        assert!(assessment.promote_to_overdue.is_empty());
    }

    #[test]
    fn test_assessment_is_idempotent() {
        let mut customer = customer();
        let today = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
        let due = NaiveDate::from_ymd_opt(2025, 4, 4).unwrap();

        let mut invoice = unpaid_invoice(
            customer.id,
            due,
            Money::new(dec!(199), Currency::USD),
            InvoiceStatus::Issued,
        );

        // First pass computes a change and promotes the invoice
        let first = assess_overdue(&customer, &[invoice.clone()], today).unwrap();
        customer.apply_overdue_summary(first.summary);
        invoice.mark_overdue();

        // Second pass over the updated state is a no-op
        assert!(assess_overdue(&customer, &[invoice], today).is_none());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use core_kernel::Currency;
    use domain_ledger::CustomerSegment;
    use proptest::prelude::*;

    proptest! {
        /// The recomputed amount always equals the sum of unpaid totals.
        #[test]
        fn overdue_amount_equals_unpaid_sum(
            amounts in proptest::collection::vec(1i64..100_000i64, 1..8),
            day_offsets in proptest::collection::vec(0u64..60u64, 1..8),
        ) {
            let customer = Customer::new(
                "P", "Q", "pq@example.com", "+1-555-0199",
                CustomerSegment::Postpaid, Currency::USD,
            );
            let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

            let invoices: Vec<Invoice> = amounts
                .iter()
                .zip(day_offsets.iter().cycle())
                .map(|(minor, offset)| {
                    let due = today - chrono::Days::new(*offset);
                    let mut inv = Invoice::new(
                        customer.id,
                        due - chrono::Days::new(10),
                        due,
                        Currency::USD,
                    );
                    inv.add_item("charge", Money::from_minor(*minor, Currency::USD)).unwrap();
                    inv.issue();
                    inv
                })
                .collect();

            let expected: Money = invoices
                .iter()
                .fold(Money::zero(Currency::USD), |acc, inv| acc + inv.total_amount);

            let assessment = assess_overdue(&customer, &invoices, today).unwrap();
            prop_assert_eq!(assessment.summary.amount_overdue, expected);
        }
    }
}
