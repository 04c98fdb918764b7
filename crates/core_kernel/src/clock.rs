//! Clock abstraction for date-sensitive engine logic
//!
//! Overdue aging, invoice issuance, and rule evaluation all depend on
//! "today". Routing those reads through a trait keeps the batch engines
//! deterministic under test: production wiring uses [`SystemClock`],
//! tests pin a [`FixedClock`] to an exact date.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current date and time
pub trait Clock: Send + Sync {
    /// Returns the current instant
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current civil date
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant, for deterministic tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    /// Creates a clock frozen at the given instant
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    /// Creates a clock frozen at midnight UTC on the given date
    pub fn on_date(date: NaiveDate) -> Self {
        Self {
            instant: date
                .and_hms_opt(0, 0, 0)
                .expect("midnight is always valid")
                .and_utc(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}
