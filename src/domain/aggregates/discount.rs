//! Discount Aggregate
//!
//! Promotion codes managed from the admin back office. A code carries its
//! own validity window and usage counters; its status is derived from the
//! calendar date rather than stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::domain::aggregates::cart::CartItem;
use crate::domain::aggregates::order::OrderId;
use crate::domain::aggregates::product::{CategoryId, ProductId};
use crate::domain::aggregates::user::UserId;
use crate::domain::value_objects::{DiscountCode, Money};

pub type DiscountId = u64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub id: DiscountId,
    pub code: DiscountCode,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub value: Decimal,
    pub minimum_amount: Option<Money>,
    pub maximum_discount: Option<Money>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub usage_limit: Option<u32>,
    pub used_count: u32,
    pub is_active: bool,
    pub apply_to: ApplyTo,
    #[serde(default)]
    pub products: Vec<ProductId>,
    #[serde(default)]
    pub categories: Vec<CategoryId>,
    pub customer_eligibility: CustomerEligibility,
    #[serde(default)]
    pub customers: Vec<UserId>,
    pub once_per_customer: bool,
    pub free_shipping: bool,
    pub created_at: NaiveDate,
    pub created_by: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind { #[default] Percentage, FixedAmount, FreeShipping }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyTo { #[default] AllProducts, SpecificProducts, SpecificCategories }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerEligibility { #[default] AllCustomers, SpecificCustomers, NewCustomers }

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountStatus { Active, Upcoming, Expired, Inactive }

impl Discount {
    pub fn from_draft(id: DiscountId, code: DiscountCode, draft: DiscountDraft, created_at: NaiveDate, created_by: impl Into<String>) -> Self {
        Self {
            id, code, name: draft.name, description: draft.description, kind: draft.kind, value: draft.value,
            minimum_amount: draft.minimum_amount, maximum_discount: draft.maximum_discount,
            start_date: draft.start_date, end_date: draft.end_date, usage_limit: draft.usage_limit, used_count: 0,
            is_active: draft.is_active, apply_to: draft.apply_to, products: draft.products, categories: draft.categories,
            customer_eligibility: draft.customer_eligibility, customers: draft.customers,
            once_per_customer: draft.once_per_customer, free_shipping: draft.free_shipping,
            created_at, created_by: created_by.into(),
        }
    }

    /// Overwrites the editable fields, keeping id, usage and audit data.
    pub fn apply(&mut self, code: DiscountCode, draft: DiscountDraft) {
        let used_count = self.used_count;
        let created_at = self.created_at;
        let created_by = std::mem::take(&mut self.created_by);
        *self = Self::from_draft(self.id, code, draft, created_at, created_by);
        self.used_count = used_count;
    }

    /// The single status shown in listings. Inactive wins over the calendar.
    pub fn status_on(&self, today: NaiveDate) -> DiscountStatus {
        if !self.is_active { DiscountStatus::Inactive }
        else if today < self.start_date { DiscountStatus::Upcoming }
        else if today > self.end_date { DiscountStatus::Expired }
        else { DiscountStatus::Active }
    }

    /// Status filter semantics: an inactive code past its end date still
    /// matches `Expired`.
    pub fn matches_status(&self, status: DiscountStatus, today: NaiveDate) -> bool {
        match status {
            DiscountStatus::Active => self.status_on(today) == DiscountStatus::Active,
            DiscountStatus::Upcoming => self.is_active && today < self.start_date,
            DiscountStatus::Expired => today > self.end_date,
            DiscountStatus::Inactive => !self.is_active,
        }
    }

    pub fn is_exhausted(&self) -> bool { self.usage_limit.is_some_and(|limit| self.used_count >= limit) }

    pub fn is_redeemable_on(&self, today: NaiveDate) -> bool {
        self.status_on(today) == DiscountStatus::Active && !self.is_exhausted()
    }

    pub fn waives_shipping(&self) -> bool { self.free_shipping || self.kind == DiscountKind::FreeShipping }

    /// Amount taken off a subtotal: nothing below the minimum spend, a
    /// percentage capped at the maximum discount, a fixed amount never
    /// exceeding the subtotal.
    pub fn amount_off(&self, subtotal: Money) -> Money {
        if self.minimum_amount.is_some_and(|min| subtotal < min) { return Money::ZERO; }
        match self.kind {
            DiscountKind::Percentage => {
                let off = subtotal.percent_of(self.value);
                match self.maximum_discount {
                    Some(cap) if cap.is_positive() && off > cap => cap,
                    _ => off,
                }
            }
            DiscountKind::FixedAmount => Money::new(self.value).min(subtotal),
            DiscountKind::FreeShipping => Money::ZERO,
        }
    }

    /// Whether a shopper may use the code. `previous_orders` counts the
    /// shopper's placed orders; guests qualify only for unrestricted codes.
    pub fn is_eligible(&self, customer: Option<UserId>, previous_orders: usize) -> bool {
        match self.customer_eligibility {
            CustomerEligibility::AllCustomers => true,
            CustomerEligibility::SpecificCustomers => customer.is_some_and(|id| self.customers.contains(&id)),
            CustomerEligibility::NewCustomers => customer.is_some() && previous_orders == 0,
        }
    }

    pub fn covers(&self, item: &CartItem) -> bool {
        match self.apply_to {
            ApplyTo::AllProducts => true,
            ApplyTo::SpecificProducts => self.products.contains(&item.product.id),
            ApplyTo::SpecificCategories => self.categories.contains(&item.product.category_id),
        }
    }

    /// Sum of the cart lines the code applies to.
    pub fn eligible_subtotal(&self, items: &[CartItem]) -> Money {
        items.iter().filter(|item| self.covers(item)).map(CartItem::line_total).sum()
    }

    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.code.as_str().to_lowercase().contains(&term)
            || self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}

/// Admin form input for creating or editing a discount.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "end_after_start", skip_on_field_errors = false))]
pub struct DiscountDraft {
    #[validate(custom = "valid_code")]
    pub code: String,
    #[validate(length(min = 3))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: DiscountKind,
    #[validate(custom = "non_negative")]
    pub value: Decimal,
    pub minimum_amount: Option<Money>,
    pub maximum_discount: Option<Money>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub usage_limit: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub apply_to: ApplyTo,
    #[serde(default)]
    pub products: Vec<ProductId>,
    #[serde(default)]
    pub categories: Vec<CategoryId>,
    #[serde(default)]
    pub customer_eligibility: CustomerEligibility,
    #[serde(default)]
    pub customers: Vec<UserId>,
    #[serde(default)]
    pub once_per_customer: bool,
    #[serde(default)]
    pub free_shipping: bool,
}

fn default_true() -> bool { true }

fn valid_code(code: &str) -> Result<(), ValidationError> {
    DiscountCode::new(code).map(|_| ()).map_err(|_| ValidationError::new("invalid_code"))
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() { Err(ValidationError::new("must_not_be_negative")) } else { Ok(()) }
}

fn end_after_start(draft: &DiscountDraft) -> Result<(), ValidationError> {
    if draft.end_date > draft.start_date { Ok(()) } else { Err(ValidationError::new("end_date_invalid")) }
}

/// Input for generating a batch of single-use style codes.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "bulk_end_after_start", skip_on_field_errors = false))]
pub struct BulkDiscountRequest {
    #[validate(length(max = 12))]
    pub prefix: String,
    #[validate(range(min = 1, max = 100))]
    pub quantity: u32,
    #[serde(rename = "type", default)]
    pub kind: DiscountKind,
    #[validate(custom = "non_negative")]
    pub value: Decimal,
    pub usage_limit: Option<u32>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn bulk_end_after_start(request: &BulkDiscountRequest) -> Result<(), ValidationError> {
    if request.end_date > request.start_date { Ok(()) } else { Err(ValidationError::new("end_date_invalid")) }
}

impl BulkDiscountRequest {
    /// Draft for the `index`-th (zero-based) generated code.
    pub fn draft(&self, index: u32, code: String) -> DiscountDraft {
        DiscountDraft {
            code, name: format!("Bulk Discount {}", index + 1), description: "Automatically generated discount code".into(),
            kind: self.kind, value: self.value, minimum_amount: None, maximum_discount: None,
            start_date: self.start_date, end_date: self.end_date, usage_limit: self.usage_limit, is_active: true,
            apply_to: ApplyTo::AllProducts, products: vec![], categories: vec![],
            customer_eligibility: CustomerEligibility::AllCustomers, customers: vec![],
            once_per_customer: true, free_shipping: false,
        }
    }
}

/// One redemption of a code against an order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountUsage {
    pub id: u64,
    pub discount_id: DiscountId,
    pub discount_code: String,
    pub order_id: OrderId,
    pub customer_id: UserId,
    pub customer_name: String,
    pub customer_email: String,
    pub discount_amount: Money,
    pub order_total: Money,
    pub used_at: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountStats {
    pub total_discounts: usize,
    pub active_discounts: usize,
    pub expired_discounts: usize,
    pub total_savings: Money,
    pub usage_count: u32,
    pub popular_discounts: Vec<PopularDiscount>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PopularDiscount { pub code: String, pub usage: u32 }

impl DiscountStats {
    pub fn compute(discounts: &[Discount], usages: &[DiscountUsage], today: NaiveDate) -> Self {
        let mut popular: Vec<&Discount> = discounts.iter().collect();
        popular.sort_by(|a, b| b.used_count.cmp(&a.used_count));
        Self {
            total_discounts: discounts.len(),
            active_discounts: discounts.iter().filter(|d| d.status_on(today) == DiscountStatus::Active).count(),
            expired_discounts: discounts.iter().filter(|d| today > d.end_date).count(),
            total_savings: usages.iter().map(|u| u.discount_amount).sum(),
            usage_count: discounts.iter().map(|d| d.used_count).sum(),
            popular_discounts: popular.into_iter().take(5).map(|d| PopularDiscount { code: d.code.to_string(), usage: d.used_count }).collect(),
        }
    }
}
