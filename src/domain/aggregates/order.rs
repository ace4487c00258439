//! Order Aggregate

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;
use crate::domain::aggregates::cart::Cart;
use crate::domain::aggregates::product::ProductId;
use crate::domain::aggregates::user::UserId;
use crate::domain::value_objects::Money;

pub type OrderId = u64;

/// A placed order. Line prices are frozen at checkout so later catalog
/// edits never change a historical total.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    date: NaiveDate,
    total: Money,
    items: Vec<OrderItem>,
    status: OrderStatus,
    shipping_address: ShippingAddress,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem { pub product_id: ProductId, pub quantity: u32, pub price: Money }

impl OrderItem {
    pub fn line_total(&self) -> Money { self.price * self.quantity }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub zip_code: String,
    #[validate(length(min = 1))]
    pub country: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus { #[default] Processing, Delivered, Cancelled }

impl Order {
    /// Snapshots the cart into a new order in `Processing`.
    pub fn place(id: OrderId, user_id: UserId, date: NaiveDate, cart: &Cart, shipping_address: ShippingAddress) -> Result<Self, OrderError> {
        if cart.is_empty() { return Err(OrderError::NoItems); }
        let items = cart.items().iter()
            .map(|line| OrderItem { product_id: line.product.id, quantity: line.quantity, price: line.unit_price() })
            .collect();
        Ok(Self::from_parts(id, user_id, date, items, OrderStatus::Processing, shipping_address))
    }

    /// Rebuilds an order from stored parts; the total is derived from the lines.
    pub fn from_parts(id: OrderId, user_id: UserId, date: NaiveDate, items: Vec<OrderItem>, status: OrderStatus, shipping_address: ShippingAddress) -> Self {
        let mut order = Self { id, user_id, date, total: Money::ZERO, items, status, shipping_address };
        order.recalculate();
        order
    }

    pub fn id(&self) -> OrderId { self.id }
    pub fn user_id(&self) -> UserId { self.user_id }
    pub fn date(&self) -> NaiveDate { self.date }
    pub fn status(&self) -> OrderStatus { self.status }
    pub fn total(&self) -> Money { self.total }
    pub fn items(&self) -> &[OrderItem] { &self.items }
    pub fn shipping_address(&self) -> &ShippingAddress { &self.shipping_address }
    pub fn item_count(&self) -> u32 { self.items.iter().map(|i| i.quantity).sum() }

    /// Back-office override; any status may follow any other.
    pub fn update_status(&mut self, status: OrderStatus) { self.status = status; }

    fn recalculate(&mut self) { self.total = self.items.iter().map(OrderItem::line_total).sum(); }
}

#[derive(Debug, Clone, Error)]
pub enum OrderError {
    #[error("Order has no items")]
    NoItems,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::product::Product;
    use crate::domain::value_objects::{DiscountPercent, Quantity};

    fn address() -> ShippingAddress {
        ShippingAddress { full_name: "Reaksa".into(), address: "123 Main St".into(), city: "Phnom Penh".into(), zip_code: "12000".into(), country: "Cambodia".into() }
    }

    fn date() -> NaiveDate { NaiveDate::from_ymd_opt(2025, 10, 16).unwrap() }

    #[test]
    fn test_order_workflow() {
        let mut cart = Cart::new();
        let product = Product {
            id: 1, name: "Widget".into(), category_id: 1, price: Money::from_major(10), description: "A widget for tests".into(),
            image_url: "w.png".into(), stock: Quantity::new(5), featured: false, discount: DiscountPercent::new(50).unwrap(),
        };
        cart.add_item(product, 2).unwrap();
        let mut order = Order::place(7, 1, date(), &cart, address()).unwrap();
        assert_eq!(order.status(), OrderStatus::Processing);
        assert_eq!(order.items()[0].price, Money::from_major(5));
        assert_eq!(order.total(), Money::from_major(10));
        order.update_status(OrderStatus::Delivered);
        order.update_status(OrderStatus::Cancelled);
        assert_eq!(order.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert!(matches!(Order::place(1, 1, date(), &Cart::new(), address()), Err(OrderError::NoItems)));
    }

    #[test]
    fn test_address_validation() {
        let mut a = address();
        a.city.clear();
        assert!(a.validate().unwrap_err().field_errors().contains_key("city"));
    }

    #[test]
    fn test_wire_format() {
        let order = Order::from_parts(2, 1, date(), vec![OrderItem { product_id: 3, quantity: 1, price: Money::from_major(399) }], OrderStatus::Processing, address());
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "Processing");
        assert_eq!(json["date"], "2025-10-16");
        assert_eq!(json["shippingAddress"]["zipCode"], "12000");
        assert_eq!(json["total"], 399.0);
    }
}
