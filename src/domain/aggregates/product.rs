//! Product Aggregate

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::domain::value_objects::{DiscountPercent, Money, Quantity};

pub type ProductId = u64;
pub type CategoryId = u64;

/// Stock level below which the dashboard counts a product as running low.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category_id: CategoryId,
    pub price: Money,
    pub description: String,
    pub image_url: String,
    pub stock: Quantity,
    pub featured: bool,
    pub discount: DiscountPercent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category { pub id: CategoryId, pub name: String }

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus { InStock, LowStock, OutOfStock }

impl Product {
    /// List price reduced by the product's percentage discount. Every cart,
    /// order and listing total is computed from this.
    pub fn discounted_price(&self) -> Money {
        if self.discount.is_zero() { self.price } else { self.price.percent_off(self.discount) }
    }

    pub fn savings(&self) -> Money { self.price.saturating_sub(self.discounted_price()) }
    pub fn is_in_stock(&self) -> bool { !self.stock.is_zero() }
    pub fn is_discounted(&self) -> bool { !self.discount.is_zero() }

    pub fn stock_status(&self, low_stock_threshold: u32) -> StockStatus {
        match self.stock.value() {
            0 => StockStatus::OutOfStock,
            n if n <= low_stock_threshold => StockStatus::LowStock,
            _ => StockStatus::InStock,
        }
    }

    pub fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id, name: draft.name, category_id: draft.category_id, price: draft.price,
            description: draft.description, image_url: draft.image_url, stock: draft.stock,
            featured: draft.featured, discount: draft.discount,
        }
    }

    /// Merges the fields present in `patch`; the id never changes.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name { self.name = name; }
        if let Some(category_id) = patch.category_id { self.category_id = category_id; }
        if let Some(price) = patch.price { self.price = price; }
        if let Some(description) = patch.description { self.description = description; }
        if let Some(image_url) = patch.image_url { self.image_url = image_url; }
        if let Some(stock) = patch.stock { self.stock = stock; }
        if let Some(featured) = patch.featured { self.featured = featured; }
        if let Some(discount) = patch.discount { self.discount = discount; }
    }
}

/// A product as entered on the admin form, before it has an id.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[validate(length(min = 3))]
    pub name: String,
    pub category_id: CategoryId,
    #[validate(custom = "positive_price")]
    pub price: Money,
    #[validate(length(min = 10))]
    pub description: String,
    #[validate(length(min = 1))]
    pub image_url: String,
    #[serde(default)]
    pub stock: Quantity,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub discount: DiscountPercent,
}

/// Partial update; absent fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[validate(length(min = 3))]
    pub name: Option<String>,
    pub category_id: Option<CategoryId>,
    #[validate(custom = "positive_price")]
    pub price: Option<Money>,
    #[validate(length(min = 10))]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub image_url: Option<String>,
    pub stock: Option<Quantity>,
    pub featured: Option<bool>,
    pub discount: Option<DiscountPercent>,
}

pub(crate) fn positive_price(price: &Money) -> Result<(), ValidationError> {
    if price.is_positive() { Ok(()) } else { Err(ValidationError::new("price_must_be_positive")) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone(discount: u8) -> Product {
        Product {
            id: 1, name: "iPhone 15 Pro".into(), category_id: 1, price: Money::from_major(1299),
            description: "Apple iPhone 15 Pro".into(), image_url: "https://example.com/p.jpg".into(),
            stock: Quantity::new(25), featured: true, discount: DiscountPercent::new(discount).unwrap(),
        }
    }

    #[test]
    fn test_discounted_price() {
        assert_eq!(phone(10).discounted_price(), Money::from_minor(116910));
        assert_eq!(phone(10).savings(), Money::from_minor(12990));
        assert_eq!(phone(0).discounted_price(), Money::from_major(1299));
    }

    #[test]
    fn test_stock_status() {
        let mut p = phone(0);
        assert_eq!(p.stock_status(LOW_STOCK_THRESHOLD), StockStatus::InStock);
        p.stock = Quantity::new(10);
        assert_eq!(p.stock_status(LOW_STOCK_THRESHOLD), StockStatus::LowStock);
        p.stock = Quantity::new(0);
        assert_eq!(p.stock_status(LOW_STOCK_THRESHOLD), StockStatus::OutOfStock);
        assert!(!p.is_in_stock());
    }

    #[test]
    fn test_patch_merges_present_fields() {
        let mut p = phone(10);
        p.apply(ProductPatch { price: Some(Money::from_major(999)), featured: Some(false), ..Default::default() });
        assert_eq!(p.price, Money::from_major(999));
        assert!(!p.featured);
        assert_eq!(p.name, "iPhone 15 Pro");
        assert_eq!(p.discount.value(), 10);
    }

    #[test]
    fn test_draft_validation() {
        let draft = ProductDraft {
            name: "TV".into(), category_id: 10, price: Money::ZERO, description: "short".into(),
            image_url: String::new(), stock: Quantity::new(1), featured: false, discount: DiscountPercent::NONE,
        };
        let errors = draft.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["name", "price", "description", "image_url"] {
            assert!(fields.contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(phone(10)).unwrap();
        assert_eq!(json["categoryId"], 1);
        assert_eq!(json["discount"], 10);
        assert_eq!(json["stock"], 25);
    }
}
