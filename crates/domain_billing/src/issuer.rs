//! Monthly invoice issuance
//!
//! Issues one invoice per postpaid customer per billing period, one line
//! item per active subscription at the plan's current price. The period
//! key makes the job safe to rerun: a customer already invoiced for the
//! current period is skipped.

use std::sync::Arc;

use chrono::{Days, NaiveDate};

use core_kernel::Clock;
use domain_ledger::{
    Customer, CustomerCommit, CustomerSegment, CycleReport, Invoice, LedgerStore, Plan,
    ServiceStatus, Subscription,
};

use crate::error::BillingError;

/// Default grace window between issue date and due date
pub const DEFAULT_DUE_DAYS: u64 = 10;

/// Builds the invoice a customer should receive for the period, if any
///
/// Returns `None` for customers outside the billable population: prepaid
/// customers, customers whose service is inactive or blocked, and
/// customers with no active subscriptions.
pub fn plan_invoice(
    customer: &Customer,
    subscriptions: &[(Subscription, Plan)],
    issue_date: NaiveDate,
    due_days: u64,
) -> Result<Option<Invoice>, BillingError> {
    if customer.segment != CustomerSegment::Postpaid {
        return Ok(None);
    }
    if !matches!(
        customer.status,
        ServiceStatus::Active | ServiceStatus::Throttled
    ) {
        return Ok(None);
    }

    let active: Vec<&(Subscription, Plan)> = subscriptions
        .iter()
        .filter(|(sub, _)| sub.is_active())
        .collect();

    if active.is_empty() {
        return Ok(None);
    }

    let due_date = issue_date
        .checked_add_days(Days::new(due_days))
        .unwrap_or(issue_date);

    let currency = customer.balance.currency();
    let mut invoice = Invoice::new(customer.id, issue_date, due_date, currency);
    for (_, plan) in active {
        invoice.add_item(plan.name.clone(), plan.price)?;
    }
    invoice.issue();

    Ok(Some(invoice))
}

/// Batch job that issues the monthly invoices
pub struct InvoiceIssuer {
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
    due_days: u64,
}

impl InvoiceIssuer {
    /// Creates an issuer with the default due window
    pub fn new(store: Arc<dyn LedgerStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            due_days: DEFAULT_DUE_DAYS,
        }
    }

    /// Overrides the grace window between issue and due date
    pub fn with_due_days(mut self, due_days: u64) -> Self {
        self.due_days = due_days;
        self
    }

    /// Issues invoices for every billable customer not yet invoiced this period
    pub async fn run(&self) -> Result<CycleReport, BillingError> {
        let today = self.clock.today();
        let customers = self
            .store
            .customers_by_segment(CustomerSegment::Postpaid)
            .await?;
        let mut report = CycleReport::default();

        tracing::info!(candidates = customers.len(), "Starting invoice issuance");

        for customer in customers {
            report.saw();
            let customer_id = customer.id;

            match self.issue_for_customer(customer_id, today).await {
                Ok(true) => report.committed(),
                Ok(false) => {}
                Err(error) => {
                    report.skipped();
                    tracing::warn!(%customer_id, %error, "Skipping customer in invoice issuance");
                }
            }
        }

        tracing::info!(
            processed = report.processed,
            issued = report.changed,
            failed = report.failed,
            "Invoice issuance finished"
        );
        Ok(report)
    }

    async fn issue_for_customer(
        &self,
        customer_id: core_kernel::CustomerId,
        today: NaiveDate,
    ) -> Result<bool, BillingError> {
        let period = domain_ledger::BillingPeriod::containing(today);
        if self.store.has_invoice_for_period(customer_id, period).await? {
            return Ok(false);
        }

        let snapshot = self.store.load_customer(customer_id).await?;
        let subscriptions = self.store.subscriptions_for_customer(customer_id).await?;

        let mut paired = Vec::with_capacity(subscriptions.len());
        for subscription in subscriptions {
            let plan = self.store.plan(subscription.plan_id).await?;
            paired.push((subscription, plan));
        }

        let Some(invoice) = plan_invoice(&snapshot.customer, &paired, today, self.due_days)? else {
            return Ok(false);
        };

        tracing::info!(
            invoice_id = %invoice.id,
            %customer_id,
            amount = %invoice.total_amount,
            "Created invoice"
        );

        let mut commit = CustomerCommit::from_snapshot(snapshot);
        commit.create_invoice(invoice);
        self.store.commit_customer(commit).await?;
        Ok(true)
    }
}
