//! Session cart, mirrored to storage after every change.

use serde::Serialize;

use super::Store;
use crate::domain::aggregates::*;
use crate::domain::value_objects::{DiscountCode, Money};
use crate::storage::{self, CART_KEY};
use crate::{Result, StoreError};

/// Figures shown on the cart and checkout pages.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub item_count: u32,
    pub subtotal: Money,
    pub discount_code: Option<DiscountCode>,
    pub discount: Money,
    pub shipping: Money,
    pub total: Money,
}

impl Store {
    pub fn cart(&self) -> &Cart { &self.cart }

    /// Adds `quantity` units of `product`, merging with an existing line.
    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) -> Result<()> {
        self.cart.add_item(product.clone(), quantity)?;
        self.persist_cart();
        tracing::debug!(product_id = product.id, quantity, "Added to cart");
        Ok(())
    }

    /// Catalog lookup followed by [`Store::add_to_cart`].
    pub fn add_product_to_cart(&mut self, product_id: ProductId, quantity: u32) -> Result<()> {
        let product = self.product_by_id(product_id).cloned().ok_or(StoreError::ProductNotFound(product_id))?;
        self.add_to_cart(&product, quantity)
    }

    pub fn remove_from_cart(&mut self, product_id: ProductId) {
        self.cart.remove_item(product_id);
        self.persist_cart();
    }

    /// Sets a line's quantity; zero removes the line and unknown ids are ignored.
    pub fn update_cart_item_quantity(&mut self, product_id: ProductId, quantity: u32) {
        self.cart.update_quantity(product_id, quantity);
        self.persist_cart();
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist_cart();
    }

    pub fn cart_total(&self) -> Money { self.cart.total() }

    pub fn cart_item_count(&self) -> u32 { self.cart.item_count() }

    /// Subtotal plus the flat shipping fee, which is waived for an empty cart.
    pub fn checkout_summary(&self) -> CheckoutSummary {
        let subtotal = self.cart_total();
        let shipping = if self.cart.is_empty() { Money::ZERO } else { self.settings.shipping_fee };
        CheckoutSummary {
            item_count: self.cart_item_count(), subtotal, discount_code: None, discount: Money::ZERO, shipping,
            total: subtotal + shipping,
        }
    }

    /// Checkout figures with a promotion code applied. Nothing is redeemed.
    /// The code only reduces the cart lines it covers, and the signed-in
    /// shopper must be eligible for it.
    pub fn preview_discount(&self, code: &str) -> Result<CheckoutSummary> {
        let code = DiscountCode::new(code)?;
        let discount = self.discount_by_code(code.as_str())
            .ok_or_else(|| StoreError::UnknownDiscountCode(code.to_string()))?;
        let customer = self.current_user().map(|user| user.id);
        let previous_orders = customer.map_or(0, |id| self.orders.iter().filter(|o| o.user_id() == id).count());
        if !discount.is_redeemable_on(Self::today()) || !discount.is_eligible(customer, previous_orders) {
            return Err(StoreError::DiscountNotRedeemable(code.to_string()));
        }
        let mut summary = self.checkout_summary();
        let eligible = discount.eligible_subtotal(self.cart.items());
        summary.discount = discount.amount_off(eligible);
        if discount.waives_shipping() && discount.minimum_amount.map_or(true, |min| eligible >= min) {
            summary.shipping = Money::ZERO;
        }
        summary.total = summary.subtotal.saturating_sub(summary.discount) + summary.shipping;
        summary.discount_code = Some(code);
        Ok(summary)
    }

    pub(super) fn persist_cart(&self) { storage::save_json(self.storage(), CART_KEY, &self.cart); }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::domain::aggregates::discount::{ApplyTo, CustomerEligibility};
    use crate::storage::{MemoryStorage, Storage};
    use crate::store::{SeedData, StoreSettings};
    use chrono::Duration;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    #[test]
    fn test_adding_same_product_merges_lines() {
        let mut store = demo_store();
        store.add_product_to_cart(3, 1).unwrap();
        store.add_product_to_cart(3, 2).unwrap();
        assert_eq!(store.cart().line_count(), 1);
        assert_eq!(store.cart_item_count(), 3);
    }

    #[test]
    fn test_cart_total_uses_discounted_prices() {
        let mut store = demo_store();
        store.add_product_to_cart(1, 1).unwrap();
        store.add_product_to_cart(3, 2).unwrap();
        assert_eq!(store.cart_total(), Money::from_minor(196710));
    }

    #[test]
    fn test_add_rejects_zero_and_unknown_product() {
        let mut store = demo_store();
        assert!(matches!(store.add_product_to_cart(1, 0), Err(StoreError::Cart(CartError::InvalidQuantity))));
        assert!(matches!(store.add_product_to_cart(77, 1), Err(StoreError::ProductNotFound(77))));
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_update_quantity_zero_removes_and_unknown_is_noop() {
        let mut store = demo_store();
        store.add_product_to_cart(2, 2).unwrap();
        store.update_cart_item_quantity(99, 5);
        assert_eq!(store.cart_item_count(), 2);
        store.update_cart_item_quantity(2, 4);
        assert_eq!(store.cart_item_count(), 4);
        store.update_cart_item_quantity(2, 0);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_cart_survives_restart_through_storage() {
        let storage = Arc::new(MemoryStorage::default());
        let mut store = Store::with_demo_data(storage.clone());
        store.add_product_to_cart(5, 2).unwrap();
        let restored = Store::with_demo_data(storage.clone());
        assert_eq!(restored.cart(), store.cart());

        store.clear_cart();
        assert_eq!(storage.get(CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_corrupt_cart_entry_reads_as_empty() {
        let storage = Arc::new(MemoryStorage::default());
        storage.set(CART_KEY, "not json").unwrap();
        let store = Store::new(SeedData::demo(), storage, StoreSettings::default());
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_checkout_summary_adds_shipping_only_when_needed() {
        let mut store = demo_store();
        assert_eq!(store.checkout_summary().total, Money::ZERO);
        store.add_product_to_cart(3, 1).unwrap();
        let summary = store.checkout_summary();
        assert_eq!(summary.shipping, Money::from_minor(999));
        assert_eq!(summary.total, Money::from_minor(40899));
    }

    #[test]
    fn test_preview_discount() {
        let mut store = admin_store();
        let today = Store::today();
        let draft = DiscountDraft {
            code: "spring10".into(), name: "Spring Sale".into(), description: String::new(),
            kind: DiscountKind::Percentage, value: Decimal::from(10), minimum_amount: None,
            maximum_discount: Some(Money::from_major(50)), start_date: today - Duration::days(1),
            end_date: today + Duration::days(30), usage_limit: None, is_active: true,
            apply_to: ApplyTo::AllProducts, products: vec![], categories: vec![],
            customer_eligibility: CustomerEligibility::AllCustomers, customers: vec![],
            once_per_customer: false, free_shipping: true,
        };
        store.create_discount(draft).unwrap();
        store.add_product_to_cart(3, 1).unwrap();
        let summary = store.preview_discount("SPRING10").unwrap();
        assert_eq!(summary.discount, Money::new(Decimal::new(399, 1)));
        assert_eq!(summary.shipping, Money::ZERO);
        assert_eq!(summary.total, Money::new(Decimal::new(3591, 1)));

        assert!(matches!(store.preview_discount("WELCOME10"), Err(StoreError::DiscountNotRedeemable(_))));
        assert!(matches!(store.preview_discount("NOPE123"), Err(StoreError::UnknownDiscountCode(_))));
    }

    fn camera_draft(customer_eligibility: CustomerEligibility, customers: Vec<u64>) -> DiscountDraft {
        let today = Store::today();
        DiscountDraft {
            code: "CAMERA10".into(), name: "Camera Week".into(), description: String::new(),
            kind: DiscountKind::Percentage, value: Decimal::from(10), minimum_amount: None, maximum_discount: None,
            start_date: today - Duration::days(1), end_date: today + Duration::days(30), usage_limit: None, is_active: true,
            apply_to: ApplyTo::SpecificProducts, products: vec![9], categories: vec![],
            customer_eligibility, customers, once_per_customer: false, free_shipping: false,
        }
    }

    #[test]
    fn test_scoped_code_reduces_only_covered_lines() {
        let mut store = admin_store();
        store.create_discount(camera_draft(CustomerEligibility::AllCustomers, vec![])).unwrap();
        store.add_product_to_cart(3, 1).unwrap();
        let summary = store.preview_discount("CAMERA10").unwrap();
        assert_eq!(summary.subtotal, Money::from_major(399));
        assert_eq!(summary.discount, Money::ZERO);
        assert_eq!(summary.total, Money::from_minor(40899));

        store.add_product_to_cart(9, 1).unwrap();
        let watch = store.product_by_id(9).unwrap().discounted_price();
        let summary = store.preview_discount("CAMERA10").unwrap();
        assert_eq!(summary.discount, watch.percent_of(Decimal::from(10)));
    }

    #[test]
    fn test_customer_restricted_code_rejects_other_shoppers() {
        let mut store = admin_store();
        store.create_discount(camera_draft(CustomerEligibility::SpecificCustomers, vec![999])).unwrap();
        store.add_product_to_cart(9, 1).unwrap();
        assert!(matches!(store.preview_discount("CAMERA10"), Err(StoreError::DiscountNotRedeemable(_))));

        let admin_id = store.current_user().unwrap().id;
        let id = store.discount_by_code("CAMERA10").unwrap().id;
        store.update_discount(id, camera_draft(CustomerEligibility::SpecificCustomers, vec![admin_id])).unwrap();
        assert!(store.preview_discount("CAMERA10").unwrap().discount.is_positive());
    }
}
