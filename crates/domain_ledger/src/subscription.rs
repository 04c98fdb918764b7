//! Plan catalog and subscriptions

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, Money, PlanId, SubscriptionId};

use crate::customer::CustomerSegment;

/// Service delivered by a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    Mobile,
    Broadband,
}

/// A sellable plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Unique identifier
    pub id: PlanId,
    /// Plan name, unique in the catalog
    pub name: String,
    /// Marketing description
    pub description: String,
    /// Recurring price (postpaid) or purchase price (prepaid)
    pub price: Money,
    /// Delivered service
    pub service_type: ServiceType,
    /// Segment the plan is sold to
    pub segment: CustomerSegment,
    /// Whether the plan is open for new signups
    pub is_active: bool,
    /// Data cap in megabytes, 0 means unlimited
    pub data_limit_mb: f64,
}

impl Plan {
    /// Creates an active plan with no data cap
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        service_type: ServiceType,
        segment: CustomerSegment,
    ) -> Self {
        Self {
            id: PlanId::new_v7(),
            name: name.into(),
            description: description.into(),
            price,
            service_type,
            segment,
            is_active: true,
            data_limit_mb: 0.0,
        }
    }

    /// Sets the data cap
    pub fn with_data_limit_mb(mut self, limit: f64) -> Self {
        self.data_limit_mb = limit;
        self
    }

    /// Returns true when the plan has no data cap
    pub fn is_unlimited(&self) -> bool {
        self.data_limit_mb == 0.0
    }
}

/// Subscription state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
}

/// A customer's enrollment in a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier
    pub id: SubscriptionId,
    /// Owning customer
    pub customer_id: CustomerId,
    /// Subscribed plan
    pub plan_id: PlanId,
    /// Activation date
    pub activated_on: NaiveDate,
    /// Status
    pub status: SubscriptionStatus,
}

impl Subscription {
    /// Creates an active subscription
    pub fn new(customer_id: CustomerId, plan_id: PlanId, activated_on: NaiveDate) -> Self {
        Self {
            id: SubscriptionId::new_v7(),
            customer_id,
            plan_id,
            activated_on,
            status: SubscriptionStatus::Active,
        }
    }

    /// Cancels the subscription
    pub fn cancel(&mut self) {
        self.status = SubscriptionStatus::Canceled;
    }

    /// Returns true while the subscription bills and meters
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}
