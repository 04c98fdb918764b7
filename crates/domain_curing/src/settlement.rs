//! Wallet settlement and service restoration
//!
//! Curing is all-or-nothing: the wallet either covers the full overdue
//! amount and every open invoice settles in one unit of work, or nothing
//! changes. Partial payment does not exist. A successful settlement
//! always restores service, whatever dunning had done to it.

use std::sync::Arc;

use core_kernel::{CustomerId, Money};
use domain_ledger::{
    Customer, CustomerCommit, CustomerSegment, DunningEventLog, Invoice, LedgerStore,
    NotificationSink, OverdueSummary, Payment, ServiceStatus,
};

use crate::error::CuringError;

/// Intended mutations of one settlement, produced by [`plan_settlement`]
#[derive(Debug, Clone)]
pub struct Settlement {
    /// Amount moved from the wallet, equal to the overdue amount
    pub amount_paid: Money,
    /// Open invoices with their status already advanced to paid
    pub invoices_paid: Vec<Invoice>,
    /// Whether service must be restored to active
    pub cure_status: bool,
}

/// Plans a full settlement of the customer's debt from their wallet
///
/// # Errors
///
/// [`CuringError::InsufficientFunds`] when the wallet balance is below
/// the overdue amount. The check is against the recorded summary, the
/// same figure the customer sees.
pub fn plan_settlement(customer: &Customer, unpaid: &[Invoice]) -> Result<Settlement, CuringError> {
    let required = customer.amount_overdue;

    if customer.balance < required {
        return Err(CuringError::InsufficientFunds {
            available: customer.balance,
            required,
        });
    }

    let invoices_paid = unpaid
        .iter()
        .filter(|invoice| invoice.is_unpaid())
        .cloned()
        .map(|mut invoice| {
            invoice.mark_paid();
            invoice
        })
        .collect();

    Ok(Settlement {
        amount_paid: required,
        invoices_paid,
        cure_status: customer.status != ServiceStatus::Active,
    })
}

/// Interactive curing operations: settlement, top-ups, data cures
pub struct CuringService {
    store: Arc<dyn LedgerStore>,
    notifier: Arc<dyn NotificationSink>,
}

impl CuringService {
    /// Creates a service over the given store and notification sink
    pub fn new(store: Arc<dyn LedgerStore>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { store, notifier }
    }

    /// Settles all open invoices from the wallet and restores service
    ///
    /// Records the internal transfer as a payment, marks every open
    /// invoice paid, clears the overdue summary, and cures the service
    /// status when it was degraded. `source` tags the payment and audit
    /// entries with who initiated the cure.
    pub async fn settle_and_cure(
        &self,
        customer_id: CustomerId,
        source: &str,
    ) -> Result<(), CuringError> {
        let snapshot = self.store.load_customer(customer_id).await?;
        let unpaid = self.store.unpaid_invoices(customer_id).await?;

        let settlement = plan_settlement(&snapshot.customer, &unpaid)?;

        tracing::info!(
            %customer_id,
            amount = %settlement.amount_paid,
            invoices = settlement.invoices_paid.len(),
            source,
            "Processing payment and cure"
        );

        let currency = settlement.amount_paid.currency();
        let mut commit = CustomerCommit::from_snapshot(snapshot);
        commit.customer.balance = commit.customer.balance.deduct(&settlement.amount_paid)?;
        commit
            .customer
            .apply_overdue_summary(OverdueSummary::cleared(currency));

        if settlement.amount_paid.is_positive() {
            commit.record_payment(Payment::invoice_payment(
                customer_id,
                settlement.amount_paid,
                source,
            )?);
        }
        for invoice in settlement.invoices_paid {
            commit.update_invoice(invoice);
        }

        let cured = settlement.cure_status;
        if cured {
            commit.customer.transition(ServiceStatus::Active);
            commit.log_event(DunningEventLog::new(
                customer_id,
                "CURED",
                source,
                "Service restored to ACTIVE.",
            ));
        }
        commit.log_event(DunningEventLog::new(
            customer_id,
            "BILL_PAID",
            source,
            format!(
                "Used balance of {} to pay all open invoices.",
                settlement.amount_paid
            ),
        ));

        let customer = commit.customer.clone();
        self.store.commit_customer(commit).await?;

        if cured {
            self.notifier.notify(
                &customer,
                "Your service has been restored. Thank you for your payment.",
            );
        }
        Ok(())
    }

    /// Credits the wallet and records the top-up
    ///
    /// Never touches service status; only settlement and subscription
    /// changes do that. Returns the new balance.
    pub async fn add_balance(
        &self,
        customer_id: CustomerId,
        amount: Money,
        source: &str,
    ) -> Result<Money, CuringError> {
        // Validates positivity before anything else
        let payment = Payment::top_up(customer_id, amount, source)?;

        let snapshot = self.store.load_customer(customer_id).await?;
        let mut commit = CustomerCommit::from_snapshot(snapshot);
        commit.customer.credit(amount);
        let new_balance = commit.customer.balance;

        commit.record_payment(payment);
        commit.log_event(DunningEventLog::new(
            customer_id,
            "BALANCE_ADDED",
            source,
            format!("Added {}. New balance: {}", amount, new_balance),
        ));

        self.store.commit_customer(commit).await?;

        tracing::info!(%customer_id, %amount, %new_balance, source, "Balance added");
        Ok(new_balance)
    }

    /// Restores full speed for a throttled prepaid customer
    ///
    /// Resets metered usage and re-activates service. A no-op for anyone
    /// who is not both prepaid and throttled: postpaid throttles clear
    /// through settlement, and an active customer needs no cure.
    pub async fn apply_data_top_up(
        &self,
        customer_id: CustomerId,
        source: &str,
    ) -> Result<bool, CuringError> {
        let snapshot = self.store.load_customer(customer_id).await?;

        if snapshot.customer.segment != CustomerSegment::Prepaid
            || snapshot.customer.status != ServiceStatus::Throttled
        {
            tracing::info!(%customer_id, "Data top-up without a throttle to cure");
            return Ok(false);
        }

        let mut commit = CustomerCommit::from_snapshot(snapshot);
        commit.customer.transition(ServiceStatus::Active);
        commit.customer.data_usage_mb = 0.0;
        commit.log_event(DunningEventLog::new(
            customer_id,
            "DATA_CURED",
            source,
            "Data top-up applied.",
        ));

        let customer = commit.customer.clone();
        self.store.commit_customer(commit).await?;

        tracing::info!(%customer_id, "Data usage reset, status set to ACTIVE");
        self.notifier.notify(
            &customer,
            "Your data top-up is complete. Your service speed is restored.",
        );
        Ok(true)
    }
}
