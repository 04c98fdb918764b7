//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant
//! fields while using defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{Currency, CustomerId, Money, PlanId};
use domain_ledger::{
    Customer, CustomerSegment, DunningAction, DunningRule, Invoice, OverdueSummary, Plan,
    SegmentFilter, ServiceStatus, ServiceType, Subscription,
};
use rust_decimal_macros::dec;

use crate::fixtures::{DateFixtures, MoneyFixtures};

/// Builder for test customers
pub struct CustomerBuilder {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    segment: CustomerSegment,
    status: ServiceStatus,
    balance: Money,
    overdue: Option<OverdueSummary>,
    data_usage_mb: f64,
}

impl Default for CustomerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerBuilder {
    /// Creates a builder for an active postpaid customer with no debt
    pub fn new() -> Self {
        Self {
            first_name: "Ravi".into(),
            last_name: "Kumar".into(),
            email: "ravi.kumar@example.com".into(),
            phone: "+1-555-0100".into(),
            segment: CustomerSegment::Postpaid,
            status: ServiceStatus::Active,
            balance: MoneyFixtures::usd_zero(),
            overdue: None,
            data_usage_mb: 0.0,
        }
    }

    /// Sets the contact name and email
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self.email = format!(
            "{}.{}@example.com",
            self.first_name.to_lowercase(),
            self.last_name.to_lowercase()
        );
        self
    }

    /// Sets the segment
    pub fn with_segment(mut self, segment: CustomerSegment) -> Self {
        self.segment = segment;
        self
    }

    /// Shorthand for a prepaid customer
    pub fn prepaid(self) -> Self {
        self.with_segment(CustomerSegment::Prepaid)
    }

    /// Sets the service status
    pub fn with_status(mut self, status: ServiceStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the wallet balance
    pub fn with_balance(mut self, balance: Money) -> Self {
        self.balance = balance;
        self
    }

    /// Sets an overdue position: amount, age in days, and oldest due date
    pub fn with_debt(mut self, amount: Money, overdue_days: u32, due_date: NaiveDate) -> Self {
        self.overdue = Some(OverdueSummary {
            amount_overdue: amount,
            overdue_days,
            due_date: Some(due_date),
        });
        self
    }

    /// Sets the metered usage
    pub fn with_data_usage_mb(mut self, usage: f64) -> Self {
        self.data_usage_mb = usage;
        self
    }

    /// Builds the customer
    pub fn build(self) -> Customer {
        let mut customer = Customer::new(
            self.first_name,
            self.last_name,
            self.email,
            self.phone,
            self.segment,
            self.balance.currency(),
        );
        customer.status = self.status;
        customer.balance = self.balance;
        customer.data_usage_mb = self.data_usage_mb;
        if let Some(summary) = self.overdue {
            customer.apply_overdue_summary(summary);
        }
        customer
    }
}

/// Builder for test invoices
pub struct InvoiceBuilder {
    customer_id: CustomerId,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    items: Vec<(String, Money)>,
    issued: bool,
    overdue: bool,
}

impl InvoiceBuilder {
    /// Creates a builder for an issued single-item invoice due in the past
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            issue_date: DateFixtures::recently_due() - chrono::Days::new(10),
            due_date: DateFixtures::recently_due(),
            items: vec![("Monthly charge".into(), MoneyFixtures::usd_100())],
            issued: true,
            overdue: false,
        }
    }

    /// Sets the due date, keeping the ten day issue window
    pub fn due_on(mut self, due_date: NaiveDate) -> Self {
        self.issue_date = due_date - chrono::Days::new(10);
        self.due_date = due_date;
        self
    }

    /// Replaces the line items with a single charge
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.items = vec![("Monthly charge".into(), amount)];
        self
    }

    /// Adds a named line item
    pub fn with_item(mut self, description: impl Into<String>, amount: Money) -> Self {
        self.items.push((description.into(), amount));
        self
    }

    /// Leaves the invoice in draft
    pub fn draft(mut self) -> Self {
        self.issued = false;
        self
    }

    /// Marks the invoice overdue
    pub fn overdue(mut self) -> Self {
        self.issued = true;
        self.overdue = true;
        self
    }

    /// Builds the invoice
    pub fn build(self) -> Invoice {
        let currency = self
            .items
            .first()
            .map(|(_, amount)| amount.currency())
            .unwrap_or(Currency::USD);
        let mut invoice = Invoice::new(self.customer_id, self.issue_date, self.due_date, currency);
        for (description, amount) in self.items {
            invoice
                .add_item(description, amount)
                .expect("builder items are positive");
        }
        if self.issued {
            invoice.issue();
        }
        if self.overdue {
            invoice.mark_overdue();
        }
        invoice
    }
}

/// Builder for test dunning rules
pub struct RuleBuilder {
    rule_name: String,
    priority: u32,
    action: DunningAction,
    target_segment: SegmentFilter,
    min_overdue_days: u32,
    max_overdue_days: u32,
    active: bool,
}

impl Default for RuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBuilder {
    /// Creates a builder for an active soft-warning rule over days 1-3
    pub fn new() -> Self {
        Self {
            rule_name: "Soft warning".into(),
            priority: 1,
            action: DunningAction::SendSms,
            target_segment: SegmentFilter::All,
            min_overdue_days: 1,
            max_overdue_days: 3,
            active: true,
        }
    }

    /// Sets the name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.rule_name = name.into();
        self
    }

    /// Sets the priority
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the action
    pub fn with_action(mut self, action: DunningAction) -> Self {
        self.action = action;
        self
    }

    /// Sets the segment filter
    pub fn for_segment(mut self, filter: SegmentFilter) -> Self {
        self.target_segment = filter;
        self
    }

    /// Sets the inclusive overdue-day band
    pub fn over_days(mut self, min: u32, max: u32) -> Self {
        self.min_overdue_days = min;
        self.max_overdue_days = max;
        self
    }

    /// Deactivates the built rule
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Builds the rule
    pub fn build(self) -> DunningRule {
        let mut rule = DunningRule::new(
            self.rule_name,
            self.priority,
            self.action,
            self.target_segment,
            self.min_overdue_days,
            self.max_overdue_days,
        )
        .expect("builder day band is valid");
        if !self.active {
            rule.deactivate();
        }
        rule
    }
}

/// Builder for test plans
pub struct PlanBuilder {
    name: String,
    description: String,
    price: Money,
    service_type: ServiceType,
    segment: CustomerSegment,
    data_limit_mb: f64,
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanBuilder {
    /// Creates a builder for an unlimited postpaid mobile plan
    pub fn new() -> Self {
        Self {
            name: "Unlimited 5G".into(),
            description: "Premium unlimited 5G".into(),
            price: Money::new(dec!(120.00), Currency::USD),
            service_type: ServiceType::Mobile,
            segment: CustomerSegment::Postpaid,
            data_limit_mb: 0.0,
        }
    }

    /// Sets the name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the price
    pub fn priced(mut self, price: Money) -> Self {
        self.price = price;
        self
    }

    /// Sets the delivered service
    pub fn with_service_type(mut self, service_type: ServiceType) -> Self {
        self.service_type = service_type;
        self
    }

    /// Sets the target segment
    pub fn for_segment(mut self, segment: CustomerSegment) -> Self {
        self.segment = segment;
        self
    }

    /// Shorthand for a capped prepaid plan
    pub fn prepaid_capped(mut self, limit_mb: f64) -> Self {
        self.segment = CustomerSegment::Prepaid;
        self.data_limit_mb = limit_mb;
        self
    }

    /// Builds the plan
    pub fn build(self) -> Plan {
        Plan::new(
            self.name,
            self.description,
            self.price,
            self.service_type,
            self.segment,
        )
        .with_data_limit_mb(self.data_limit_mb)
    }
}

/// Creates an active subscription linking a customer to a plan
pub fn subscription_for(customer_id: CustomerId, plan_id: PlanId) -> Subscription {
    Subscription::new(customer_id, plan_id, DateFixtures::activation())
}
