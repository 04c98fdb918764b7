//! End-to-end lifecycle tests: seed, bill, age, dun, cure
//!
//! Drives the full pipeline the way the scheduler and the support desk
//! would together: subscribe, issue invoices, let the debt age, enforce
//! rules, then top up and settle. Two runners share one store but pin
//! different dates, standing in for the passage of time.

use std::sync::Arc;

use chrono::NaiveDate;

use core_kernel::{Currency, CustomerId, FixedClock, Money};
use domain_curing::{CuringService, SubscriptionLifecycle};
use domain_ledger::{
    Customer, CustomerSegment, InvoiceStatus, LedgerStore, Plan, ServiceStatus,
};
use infra_mem::{MemoryLedger, TracingNotifier};
use interface_jobs::{seed_demo_data, JobRunner, JobsConfig};
use rust_decimal_macros::dec;

fn issue_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
}

fn runner_on(store: &Arc<MemoryLedger>, date: NaiveDate) -> JobRunner {
    JobRunner::new(
        store.clone(),
        Arc::new(FixedClock::on_date(date)),
        Arc::new(TracingNotifier::new()),
        &JobsConfig::default(),
    )
}

fn days_after(base: NaiveDate, days: u64) -> NaiveDate {
    base + chrono::Days::new(days)
}

async fn seeded_store() -> Arc<MemoryLedger> {
    let store = Arc::new(MemoryLedger::new());
    seed_demo_data(store.as_ref()).await.unwrap();
    store
}

async fn customer_by_email(store: &MemoryLedger, email: &str) -> Customer {
    store
        .customers()
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.email == email)
        .expect("seeded customer")
}

/// Subscribes the customer to the given plan on the given date
async fn subscribe_on(
    store: &Arc<MemoryLedger>,
    customer_id: CustomerId,
    plan: &Plan,
    date: NaiveDate,
) {
    let lifecycle =
        SubscriptionLifecycle::new(store.clone(), Arc::new(FixedClock::on_date(date)));
    lifecycle
        .subscribe(customer_id, plan.id, "PORTAL")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_postpaid_journey_from_invoice_to_cure() {
    let store = seeded_store().await;
    let ramesh = customer_by_email(&store, "ramesh@test.com").await;

    // Enroll in FibreNet at $199/month
    let fibre = Plan::new(
        "FibreNet Test",
        "100 mbps",
        Money::new(dec!(199.00), Currency::USD),
        domain_ledger::ServiceType::Broadband,
        CustomerSegment::Postpaid,
    );
    store.insert_plan(fibre.clone()).await.unwrap();
    subscribe_on(&store, ramesh.id, &fibre, issue_day()).await;

    // Day 0: invoice issuance
    let issued = runner_on(&store, issue_day())
        .run_invoice_issuance()
        .await
        .unwrap();
    assert_eq!(issued.changed, 1);

    let invoices = store.invoices_for_customer(ramesh.id).await.unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].total_amount.amount(), dec!(199));
    assert_eq!(invoices[0].due_date, days_after(issue_day(), 10));

    // Day 16: due date is six days gone; recompute then enforce
    let later = runner_on(&store, days_after(issue_day(), 16));
    later.run_billing_cycle_update().await.unwrap();

    let aged = store.load_customer(ramesh.id).await.unwrap().customer;
    assert_eq!(aged.overdue_days, 6);
    assert_eq!(aged.amount_overdue.amount(), dec!(199));

    // Rule 2 (throttle postpaid, days 5-7) outranks the day-1-4 warning
    later.run_dunning_cycle().await.unwrap();
    let throttled = store.load_customer(ramesh.id).await.unwrap().customer;
    assert_eq!(throttled.status, ServiceStatus::Throttled);

    // Support desk: top up 300, then settle in full
    let curing = CuringService::new(store.clone(), Arc::new(TracingNotifier::new()));
    curing
        .add_balance(ramesh.id, Money::new(dec!(300), Currency::USD), "PORTAL")
        .await
        .unwrap();
    curing
        .settle_and_cure(ramesh.id, "AGENT:susan")
        .await
        .unwrap();

    let cured = store.load_customer(ramesh.id).await.unwrap().customer;
    assert_eq!(cured.status, ServiceStatus::Active);
    assert_eq!(cured.balance.amount(), dec!(101));
    assert!(!cured.has_debt());

    let invoices = store.invoices_for_customer(ramesh.id).await.unwrap();
    assert!(invoices
        .iter()
        .all(|invoice| invoice.status == InvoiceStatus::Paid));

    let events = store.events_for_customer(ramesh.id).await.unwrap();
    let cured_events = events.iter().filter(|e| e.action_taken == "CURED").count();
    let paid_events = events
        .iter()
        .filter(|e| e.action_taken == "BILL_PAID")
        .count();
    assert_eq!(cured_events, 1);
    assert_eq!(paid_events, 1);

    // The cured customer is no longer a dunning candidate
    later.run_billing_cycle_update().await.unwrap();
    let report = later.run_dunning_cycle().await.unwrap();
    assert_eq!(report.processed, 0);
}

#[tokio::test]
async fn test_debt_older_than_a_week_blocks_service() {
    let store = seeded_store().await;
    let mike = customer_by_email(&store, "mike@test.com").await;

    let plan = Plan::new(
        "Net500 Test",
        "500 mbps",
        Money::new(dec!(299.00), Currency::USD),
        domain_ledger::ServiceType::Broadband,
        CustomerSegment::Postpaid,
    );
    store.insert_plan(plan.clone()).await.unwrap();
    subscribe_on(&store, mike.id, &plan, issue_day()).await;

    runner_on(&store, issue_day())
        .run_invoice_issuance()
        .await
        .unwrap();

    // Day 20: ten days past due, rule 3 blocks
    let later = runner_on(&store, days_after(issue_day(), 20));
    later.run_billing_cycle_update().await.unwrap();
    later.run_dunning_cycle().await.unwrap();

    let blocked = store.load_customer(mike.id).await.unwrap().customer;
    assert_eq!(blocked.status, ServiceStatus::Blocked);

    // A second cycle leaves the blocked customer alone
    let repeat = later.run_dunning_cycle().await.unwrap();
    assert_eq!(repeat.processed, 0);
}

#[tokio::test]
async fn test_issuance_rerun_within_a_period_is_idempotent() {
    let store = seeded_store().await;
    let david = customer_by_email(&store, "david@test.com").await;

    let plan = Plan::new(
        "FibreNet Rerun",
        "100 mbps",
        Money::new(dec!(199.00), Currency::USD),
        domain_ledger::ServiceType::Broadband,
        CustomerSegment::Postpaid,
    );
    store.insert_plan(plan.clone()).await.unwrap();
    subscribe_on(&store, david.id, &plan, issue_day()).await;

    let runner = runner_on(&store, issue_day());
    runner.run_invoice_issuance().await.unwrap();
    runner.run_invoice_issuance().await.unwrap();
    // Later in the same calendar month
    runner_on(&store, days_after(issue_day(), 20))
        .run_invoice_issuance()
        .await
        .unwrap();

    assert_eq!(
        store.invoices_for_customer(david.id).await.unwrap().len(),
        1
    );

    // A new period issues again
    let next_month = runner_on(&store, days_after(issue_day(), 31));
    next_month.run_invoice_issuance().await.unwrap();
    assert_eq!(
        store.invoices_for_customer(david.id).await.unwrap().len(),
        2
    );
}

#[tokio::test]
async fn test_prepaid_journey_throttle_and_data_cure() {
    let store = seeded_store().await;
    let priya = customer_by_email(&store, "priya@test.com").await;

    // Fund the wallet, then buy the capped 10GB plan
    let curing = CuringService::new(store.clone(), Arc::new(TracingNotifier::new()));
    curing
        .add_balance(priya.id, Money::new(dec!(200), Currency::USD), "PORTAL")
        .await
        .unwrap();

    let plan = Plan::new(
        "MobilePrepaid Test",
        "10GB Data",
        Money::new(dec!(149.00), Currency::USD),
        domain_ledger::ServiceType::Mobile,
        CustomerSegment::Prepaid,
    )
    .with_data_limit_mb(10_240.0);
    store.insert_plan(plan.clone()).await.unwrap();
    subscribe_on(&store, priya.id, &plan, issue_day()).await;

    let after_purchase = store.load_customer(priya.id).await.unwrap().customer;
    assert_eq!(after_purchase.balance.amount(), dec!(51));
    assert_eq!(after_purchase.status, ServiceStatus::Active);

    // Burn through the cap: 103 ticks of 100 MB crosses 10,240
    let runner = runner_on(&store, issue_day());
    for _ in 0..103 {
        runner.run_usage_simulation().await.unwrap();
    }

    let throttled = store.load_customer(priya.id).await.unwrap().customer;
    assert_eq!(throttled.status, ServiceStatus::Throttled);
    assert_eq!(throttled.data_usage_mb, 10_300.0);

    // Data top-up restores speed and resets the meter
    curing.apply_data_top_up(priya.id, "PORTAL").await.unwrap();
    let restored = store.load_customer(priya.id).await.unwrap().customer;
    assert_eq!(restored.status, ServiceStatus::Active);
    assert_eq!(restored.data_usage_mb, 0.0);

    let events = store.events_for_customer(priya.id).await.unwrap();
    assert!(events.iter().any(|e| e.action_taken == "DATA_CURED"));
}
