//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{Currency, Money};
use domain_ledger::{CustomerSegment, DunningAction, SegmentFilter, ServiceStatus};
use proptest::prelude::*;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::INR),
        Just(Currency::SGD),
    ]
}

/// Strategy for generating valid positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for generating valid Money values with positive amounts
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (positive_amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for generating valid USD Money values
pub fn usd_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(|amount| Money::from_minor(amount, Currency::USD))
}

/// Strategy for generating customer segments
pub fn segment_strategy() -> impl Strategy<Value = CustomerSegment> {
    prop_oneof![
        Just(CustomerSegment::Prepaid),
        Just(CustomerSegment::Postpaid),
    ]
}

/// Strategy for generating service statuses
pub fn service_status_strategy() -> impl Strategy<Value = ServiceStatus> {
    prop_oneof![
        Just(ServiceStatus::Inactive),
        Just(ServiceStatus::Active),
        Just(ServiceStatus::Throttled),
        Just(ServiceStatus::Blocked),
    ]
}

/// Strategy for generating dunning actions
pub fn dunning_action_strategy() -> impl Strategy<Value = DunningAction> {
    prop_oneof![
        Just(DunningAction::SendSms),
        Just(DunningAction::SendEmail),
        Just(DunningAction::NotifyThrottle),
        Just(DunningAction::ThrottleData),
        Just(DunningAction::BlockVoice),
        Just(DunningAction::BlockAllServices),
    ]
}

/// Strategy for generating segment filters
pub fn segment_filter_strategy() -> impl Strategy<Value = SegmentFilter> {
    prop_oneof![
        Just(SegmentFilter::All),
        Just(SegmentFilter::Prepaid),
        Just(SegmentFilter::Postpaid),
    ]
}

/// Strategy for generating valid inclusive overdue-day bands
pub fn day_band_strategy() -> impl Strategy<Value = (u32, u32)> {
    (0u32..60u32, 0u32..30u32).prop_map(|(min, width)| (min, min + width))
}
