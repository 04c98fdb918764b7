//! Demo data seeding
//!
//! Loads the plan catalog, a handful of customers, and the default rule
//! ladder into an empty store. The rule bands are disjoint, so evaluation
//! order only matters when an operator later adds overlapping rules.

use core_kernel::{Currency, Money};
use domain_ledger::{
    Customer, CustomerSegment, DunningAction, DunningRule, LedgerStore, Plan, SegmentFilter,
    ServiceType, StoreError,
};
use rust_decimal_macros::dec;

const CURRENCY: Currency = Currency::USD;

/// Seeds the demo catalog, customers, and rules
pub async fn seed_demo_data(store: &dyn LedgerStore) -> Result<(), StoreError> {
    for plan in demo_plans() {
        store.insert_plan(plan).await?;
    }
    for customer in demo_customers() {
        store.insert_customer(customer).await?;
    }
    for rule in demo_rules() {
        store.insert_rule(rule).await?;
    }

    tracing::info!("Seeded demo plans, customers, and dunning rules");
    Ok(())
}

fn demo_plans() -> Vec<Plan> {
    vec![
        Plan::new(
            "Net50",
            "50 mbps",
            Money::new(dec!(29.00), CURRENCY),
            ServiceType::Broadband,
            CustomerSegment::Prepaid,
        )
        .with_data_limit_mb(5_000.0),
        Plan::new(
            "Net100",
            "100 mbps",
            Money::new(dec!(59.00), CURRENCY),
            ServiceType::Broadband,
            CustomerSegment::Prepaid,
        )
        .with_data_limit_mb(10_000.0),
        Plan::new(
            "FibreNet",
            "100 mbps",
            Money::new(dec!(199.00), CURRENCY),
            ServiceType::Broadband,
            CustomerSegment::Postpaid,
        ),
        Plan::new(
            "Net500",
            "500 mbps",
            Money::new(dec!(299.00), CURRENCY),
            ServiceType::Broadband,
            CustomerSegment::Postpaid,
        ),
        Plan::new(
            "Unlimited 5G",
            "Premium 5G",
            Money::new(dec!(499.00), CURRENCY),
            ServiceType::Mobile,
            CustomerSegment::Postpaid,
        ),
        Plan::new(
            "MobilePrepaid-10GB",
            "10GB Data",
            Money::new(dec!(149.00), CURRENCY),
            ServiceType::Mobile,
            CustomerSegment::Prepaid,
        )
        .with_data_limit_mb(10_240.0),
    ]
}

fn demo_customers() -> Vec<Customer> {
    vec![
        Customer::new(
            "Ramesh",
            "Kumar",
            "ramesh@test.com",
            "9876543210",
            CustomerSegment::Postpaid,
            CURRENCY,
        ),
        Customer::new(
            "Priya",
            "Sharma",
            "priya@test.com",
            "9123456789",
            CustomerSegment::Prepaid,
            CURRENCY,
        ),
        Customer::new(
            "David",
            "Lee",
            "david@test.com",
            "9234567890",
            CustomerSegment::Postpaid,
            CURRENCY,
        ),
        Customer::new(
            "Sarah",
            "Chen",
            "sarah@test.com",
            "9345678901",
            CustomerSegment::Prepaid,
            CURRENCY,
        ),
        Customer::new(
            "Mike",
            "Brown",
            "mike@test.com",
            "9456789012",
            CustomerSegment::Postpaid,
            CURRENCY,
        ),
    ]
}

fn demo_rules() -> Vec<DunningRule> {
    // Construction can only fail on an inverted band; these are fixed.
    [
        DunningRule::new(
            "Rule 1: Day 3 Warning",
            1,
            DunningAction::SendEmail,
            SegmentFilter::All,
            1,
            4,
        ),
        DunningRule::new(
            "Rule 2: Day 5 Throttle",
            2,
            DunningAction::ThrottleData,
            SegmentFilter::Postpaid,
            5,
            7,
        ),
        DunningRule::new(
            "Rule 3: Day 8 Block",
            3,
            DunningAction::BlockAllServices,
            SegmentFilter::Postpaid,
            8,
            999,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog_shape() {
        assert_eq!(demo_plans().len(), 6);
        assert_eq!(demo_customers().len(), 5);
        assert_eq!(demo_rules().len(), 3);
    }

    #[test]
    fn test_demo_rule_bands_are_disjoint() {
        let mut rules = demo_rules();
        rules.sort_by_key(|r| r.min_overdue_days);

        for pair in rules.windows(2) {
            assert!(pair[0].max_overdue_days < pair[1].min_overdue_days);
        }
    }

    #[test]
    fn test_prepaid_plans_are_capped() {
        for plan in demo_plans() {
            if plan.segment == CustomerSegment::Prepaid {
                assert!(!plan.is_unlimited(), "{} should carry a cap", plan.name);
            }
        }
    }
}
