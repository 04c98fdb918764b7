//! Integration tests for the billing engines over the in-memory store

use std::sync::Arc;

use core_kernel::FixedClock;
use domain_billing::{BillingCycleProcessor, InvoiceIssuer, UsageMeter};
use domain_ledger::{InvoiceStatus, LedgerStore, ServiceStatus};
use infra_mem::MemoryLedger;
use test_utils::{
    subscription_for, CustomerBuilder, DateFixtures, InvoiceBuilder, MoneyFixtures, PlanBuilder,
};

fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::on_date(DateFixtures::today()))
}

mod invoice_issuance {
    use super::*;

    #[tokio::test]
    async fn test_issues_one_invoice_per_postpaid_customer() {
        let store = Arc::new(MemoryLedger::new());
        let clock = fixed_clock();

        let customer = CustomerBuilder::new().build();
        let customer_id = customer.id;
        let plan = PlanBuilder::new().build();
        let price = plan.price;
        store.insert_customer(customer).await.unwrap();
        store.insert_plan(plan.clone()).await.unwrap();
        let snapshot = store.load_customer(customer_id).await.unwrap();
        let mut commit = domain_ledger::CustomerCommit::from_snapshot(snapshot);
        commit.create_subscription(subscription_for(customer_id, plan.id));
        store.commit_customer(commit).await.unwrap();

        let issuer = InvoiceIssuer::new(store.clone(), clock);
        let report = issuer.run().await.unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.changed, 1);
        assert_eq!(report.failed, 0);

        let invoices = store.invoices_for_customer(customer_id).await.unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].status, InvoiceStatus::Issued);
        assert_eq!(invoices[0].total_amount, price);
        assert_eq!(
            invoices[0].due_date,
            DateFixtures::today() + chrono::Days::new(10)
        );
    }

    #[tokio::test]
    async fn test_rerun_does_not_duplicate_invoices() {
        let store = Arc::new(MemoryLedger::new());
        let clock = fixed_clock();

        let customer = CustomerBuilder::new().build();
        let customer_id = customer.id;
        let plan = PlanBuilder::new().build();
        store.insert_customer(customer).await.unwrap();
        store.insert_plan(plan.clone()).await.unwrap();
        let snapshot = store.load_customer(customer_id).await.unwrap();
        let mut commit = domain_ledger::CustomerCommit::from_snapshot(snapshot);
        commit.create_subscription(subscription_for(customer_id, plan.id));
        store.commit_customer(commit).await.unwrap();

        let issuer = InvoiceIssuer::new(store.clone(), clock);
        issuer.run().await.unwrap();
        let second = issuer.run().await.unwrap();

        assert_eq!(second.changed, 0);
        let invoices = store.invoices_for_customer(customer_id).await.unwrap();
        assert_eq!(invoices.len(), 1);
    }

    #[tokio::test]
    async fn test_prepaid_and_subscriptionless_customers_are_skipped() {
        let store = Arc::new(MemoryLedger::new());
        let clock = fixed_clock();

        let prepaid = CustomerBuilder::new().prepaid().build();
        let bare_postpaid = CustomerBuilder::new().with_name("Lena", "Ortiz").build();
        let prepaid_id = prepaid.id;
        let bare_id = bare_postpaid.id;
        store.insert_customer(prepaid).await.unwrap();
        store.insert_customer(bare_postpaid).await.unwrap();

        let issuer = InvoiceIssuer::new(store.clone(), clock);
        let report = issuer.run().await.unwrap();

        assert_eq!(report.changed, 0);
        assert!(store.invoices_for_customer(prepaid_id).await.unwrap().is_empty());
        assert!(store.invoices_for_customer(bare_id).await.unwrap().is_empty());
    }
}

mod cycle_update {
    use super::*;

    #[tokio::test]
    async fn test_cycle_recomputes_summary_and_promotes_invoices() {
        let store = Arc::new(MemoryLedger::new());
        let clock = fixed_clock();

        let customer = CustomerBuilder::new().build();
        let customer_id = customer.id;
        store.insert_customer(customer).await.unwrap();

        let invoice = InvoiceBuilder::new(customer_id)
            .with_amount(MoneyFixtures::usd_monthly_bundle())
            .due_on(DateFixtures::recently_due())
            .build();
        let invoice_id = invoice.id;
        let snapshot = store.load_customer(customer_id).await.unwrap();
        let mut commit = domain_ledger::CustomerCommit::from_snapshot(snapshot);
        commit.create_invoice(invoice);
        store.commit_customer(commit).await.unwrap();

        let processor = BillingCycleProcessor::new(store.clone(), clock);
        let report = processor.run().await.unwrap();

        assert_eq!(report.changed, 1);

        let reloaded = store.load_customer(customer_id).await.unwrap().customer;
        assert_eq!(
            reloaded.amount_overdue,
            MoneyFixtures::usd_monthly_bundle()
        );
        assert_eq!(reloaded.overdue_days, 6);
        assert_eq!(reloaded.due_date, Some(DateFixtures::recently_due()));
        assert_eq!(
            store.invoice(invoice_id).await.unwrap().status,
            InvoiceStatus::Overdue
        );
    }

    #[tokio::test]
    async fn test_cycle_is_idempotent() {
        let store = Arc::new(MemoryLedger::new());
        let clock = fixed_clock();

        let customer = CustomerBuilder::new().build();
        let customer_id = customer.id;
        store.insert_customer(customer).await.unwrap();

        let invoice = InvoiceBuilder::new(customer_id)
            .with_amount(MoneyFixtures::usd_monthly_bundle())
            .due_on(DateFixtures::recently_due())
            .build();
        let snapshot = store.load_customer(customer_id).await.unwrap();
        let mut commit = domain_ledger::CustomerCommit::from_snapshot(snapshot);
        commit.create_invoice(invoice);
        store.commit_customer(commit).await.unwrap();

        let processor = BillingCycleProcessor::new(store.clone(), clock);
        processor.run().await.unwrap();
        let before = store.load_customer(customer_id).await.unwrap();

        let second = processor.run().await.unwrap();
        let after = store.load_customer(customer_id).await.unwrap();

        assert_eq!(second.changed, 0);
        assert_eq!(before.version, after.version);
        assert_eq!(before.customer.overdue_days, after.customer.overdue_days);
    }

    #[tokio::test]
    async fn test_cycle_clears_stale_debt_when_invoices_are_paid() {
        let store = Arc::new(MemoryLedger::new());
        let clock = fixed_clock();

        let customer = CustomerBuilder::new()
            .with_debt(
                MoneyFixtures::usd_monthly_bundle(),
                6,
                DateFixtures::recently_due(),
            )
            .build();
        let customer_id = customer.id;
        store.insert_customer(customer).await.unwrap();

        let processor = BillingCycleProcessor::new(store.clone(), clock);
        let report = processor.run().await.unwrap();

        assert_eq!(report.changed, 1);
        let reloaded = store.load_customer(customer_id).await.unwrap().customer;
        assert!(!reloaded.has_debt());
        assert_eq!(reloaded.overdue_days, 0);
        assert!(reloaded.due_date.is_none());
    }
}

mod usage_metering {
    use super::*;

    async fn seed_prepaid(
        store: &Arc<MemoryLedger>,
        usage_mb: f64,
        limit_mb: f64,
    ) -> core_kernel::CustomerId {
        let customer = CustomerBuilder::new()
            .prepaid()
            .with_data_usage_mb(usage_mb)
            .build();
        let customer_id = customer.id;
        let plan = PlanBuilder::new()
            .named("Prepaid 10GB")
            .prepaid_capped(limit_mb)
            .build();
        store.insert_customer(customer).await.unwrap();
        store.insert_plan(plan.clone()).await.unwrap();
        let snapshot = store.load_customer(customer_id).await.unwrap();
        let mut commit = domain_ledger::CustomerCommit::from_snapshot(snapshot);
        commit.create_subscription(subscription_for(customer_id, plan.id));
        store.commit_customer(commit).await.unwrap();
        customer_id
    }

    #[tokio::test]
    async fn test_tick_advances_usage() {
        let store = Arc::new(MemoryLedger::new());
        let customer_id = seed_prepaid(&store, 500.0, 10_000.0).await;

        let meter = UsageMeter::new(store.clone());
        let report = meter.run().await.unwrap();

        assert_eq!(report.changed, 1);
        let reloaded = store.load_customer(customer_id).await.unwrap().customer;
        assert_eq!(reloaded.data_usage_mb, 600.0);
        assert_eq!(reloaded.status, ServiceStatus::Active);
    }

    #[tokio::test]
    async fn test_crossing_the_cap_throttles() {
        let store = Arc::new(MemoryLedger::new());
        let customer_id = seed_prepaid(&store, 9_950.0, 10_000.0).await;

        let meter = UsageMeter::new(store.clone());
        meter.run().await.unwrap();

        let reloaded = store.load_customer(customer_id).await.unwrap().customer;
        assert_eq!(reloaded.data_usage_mb, 10_050.0);
        assert_eq!(reloaded.status, ServiceStatus::Throttled);
    }

    #[tokio::test]
    async fn test_throttled_customer_stops_accruing() {
        let store = Arc::new(MemoryLedger::new());
        let customer_id = seed_prepaid(&store, 9_950.0, 10_000.0).await;

        let meter = UsageMeter::new(store.clone());
        meter.run().await.unwrap();
        let second = meter.run().await.unwrap();

        assert_eq!(second.changed, 0);
        let reloaded = store.load_customer(customer_id).await.unwrap().customer;
        assert_eq!(reloaded.data_usage_mb, 10_050.0);
    }
}
