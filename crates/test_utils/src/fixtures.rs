//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the dunning
//! system. These fixtures are designed to be consistent and predictable
//! for unit tests.

use chrono::NaiveDate;
use core_kernel::{Currency, Money};
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A standard USD amount
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }

    /// The combined monthly charge of the standard postpaid bundle
    pub fn usd_monthly_bundle() -> Money {
        Money::new(dec!(199.00), Currency::USD)
    }

    /// A wallet balance that covers the standard bundle with room left
    pub fn usd_healthy_wallet() -> Money {
        Money::new(dec!(300.00), Currency::USD)
    }

    /// A wallet balance short of the standard bundle
    pub fn usd_thin_wallet() -> Money {
        Money::new(dec!(50.00), Currency::USD)
    }

    /// A zero amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// A EUR amount for currency mismatch tests
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }
}

/// Fixture for temporal test data
pub struct DateFixtures;

impl DateFixtures {
    /// The canonical "today" used by fixed-clock tests (Apr 10, 2025)
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 10).expect("valid date")
    }

    /// A due date a few days in the past relative to [`Self::today`]
    pub fn recently_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 4).expect("valid date")
    }

    /// A due date long past relative to [`Self::today`]
    pub fn long_overdue() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 1).expect("valid date")
    }

    /// A due date still in the future relative to [`Self::today`]
    pub fn not_yet_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 20).expect("valid date")
    }

    /// A subscription activation date well before any invoice
    pub fn activation() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date")
    }
}
