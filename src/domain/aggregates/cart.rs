//! Cart Aggregate

use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::domain::aggregates::product::{Product, ProductId};
use crate::domain::value_objects::Money;

/// The current session's cart. Serializes as a bare array of lines so it
/// can be cached as-is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn unit_price(&self) -> Money { self.product.discounted_price() }
    pub fn line_total(&self) -> Money { self.unit_price() * self.quantity }
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn line_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn contains(&self, product_id: ProductId) -> bool { self.items.iter().any(|i| i.product.id == product_id) }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u32 { self.items.iter().map(|i| i.quantity).sum() }

    /// Always recomputed from the lines, never cached.
    pub fn total(&self) -> Money { self.items.iter().map(CartItem::line_total).sum() }

    /// Adds `quantity` units, accumulating onto an existing line for the same product.
    pub fn add_item(&mut self, product: Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 { return Err(CartError::InvalidQuantity); }
        if let Some(existing) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem { product, quantity });
        }
        Ok(())
    }

    /// Sets the quantity of a line; zero removes it. Returns false when the
    /// product is not in the cart.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) else { return false };
        if quantity == 0 { self.items.retain(|i| i.product.id != product_id); }
        else { item.quantity = quantity; }
        true
    }

    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product.id != product_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) { self.items.clear(); }
}

#[derive(Debug, Clone, Error)]
pub enum CartError {
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{DiscountPercent, Quantity};

    fn product(id: ProductId, price: i64, discount: u8) -> Product {
        Product {
            id, name: format!("Product {id}"), category_id: 1, price: Money::from_major(price),
            description: "A product description".into(), image_url: "https://example.com/p.jpg".into(),
            stock: Quantity::new(10), featured: false, discount: DiscountPercent::new(discount).unwrap(),
        }
    }

    #[test]
    fn test_cart_operations() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 10, 0), 2).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total(), Money::from_major(20));
        cart.add_item(product(1, 10, 0), 1).unwrap();
        assert_eq!(cart.items()[0].quantity, 3); // Merged
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_total_uses_discounted_price() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 1299, 10), 1).unwrap();
        cart.add_item(product(3, 399, 0), 2).unwrap();
        assert_eq!(cart.total(), Money::from_minor(196710));
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add_item(product(1, 10, 0), 2).unwrap();
        assert!(cart.update_quantity(1, 5));
        assert_eq!(cart.item_count(), 5);
        assert!(cart.update_quantity(1, 0));
        assert!(cart.is_empty());
        assert!(!cart.update_quantity(42, 1));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut cart = Cart::new();
        assert!(cart.add_item(product(1, 10, 0), 0).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_serializes_as_array() {
        let mut cart = Cart::new();
        cart.add_item(product(2, 5, 0), 1).unwrap();
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["quantity"], 1);
        assert_eq!(json[0]["product"]["id"], 2);
        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }
}
