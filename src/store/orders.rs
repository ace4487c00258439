//! Checkout and order lifecycle.

use validator::Validate;

use super::{next_id, Store};
use crate::domain::aggregates::*;
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::{Result, StoreError};

impl Store {
    /// Freezes the cart into a new `Processing` order for the signed-in
    /// user and empties the cart.
    pub fn create_order(&mut self, shipping_address: ShippingAddress) -> Result<OrderId> {
        shipping_address.validate()?;
        let user_id = self.require_user()?.id;
        let id = next_id(&self.orders, |o| o.id());
        let order = Order::place(id, user_id, Self::today(), &self.cart, shipping_address)?;
        let total = order.total();
        self.orders.push(order);
        self.clear_cart();
        self.raise_event(DomainEvent::Order(OrderEvent::Placed { order_id: id, user_id, total }));
        tracing::info!(order_id = id, user_id, %total, "Order placed");
        Ok(id)
    }

    /// Every order for an administrator, the user's own otherwise, none
    /// when signed out.
    pub fn orders(&self) -> Vec<&Order> {
        match self.current_user() {
            Some(user) if user.is_admin() => self.orders.iter().collect(),
            Some(user) => self.orders.iter().filter(|o| o.user_id() == user.id).collect(),
            None => Vec::new(),
        }
    }

    /// Visible orders, newest first, optionally narrowed to one status.
    pub fn orders_with_status(&self, status: Option<OrderStatus>) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders().into_iter().filter(|o| status.map_or(true, |s| o.status() == s)).collect();
        orders.sort_by(|a, b| b.date().cmp(&a.date()).then(b.id().cmp(&a.id())));
        orders
    }

    pub fn order_by_id(&self, order_id: OrderId) -> Option<&Order> { self.orders.iter().find(|o| o.id() == order_id) }

    pub fn update_order_status(&mut self, order_id: OrderId, status: OrderStatus) -> Result<&Order> {
        let index = self.orders.iter().position(|o| o.id() == order_id).ok_or(StoreError::OrderNotFound(order_id))?;
        self.orders[index].update_status(status);
        self.raise_event(DomainEvent::Order(OrderEvent::StatusChanged { order_id, status }));
        tracing::info!(order_id, ?status, "Order status updated");
        Ok(&self.orders[index])
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::domain::value_objects::Money;

    #[test]
    fn test_create_order_snapshots_and_clears_cart() {
        let mut store = customer_store();
        store.add_product_to_cart(1, 1).unwrap();
        store.add_product_to_cart(3, 2).unwrap();
        let total = store.cart_total();
        let id = store.create_order(address()).unwrap();
        assert_eq!(id, 3);
        assert!(store.cart().is_empty());

        let order = store.order_by_id(id).unwrap();
        assert_eq!(order.total(), total);
        assert_eq!(order.total(), Money::from_minor(196710));
        assert_eq!(order.status(), OrderStatus::Processing);
        assert_eq!(order.items()[0].price, Money::from_minor(116910));
        assert!(matches!(store.take_events().as_slice(), [DomainEvent::Order(OrderEvent::Placed { order_id: 3, .. })]));
    }

    #[test]
    fn test_order_keeps_price_after_catalog_change() {
        let mut store = customer_store();
        store.add_product_to_cart(3, 1).unwrap();
        let id = store.create_order(address()).unwrap();
        store.update_product(3, ProductPatch { price: Some(Money::from_major(10)), ..Default::default() }).unwrap();
        assert_eq!(store.order_by_id(id).unwrap().total(), Money::from_major(399));
    }

    #[test]
    fn test_create_order_requirements() {
        let mut store = demo_store();
        store.add_product_to_cart(3, 1).unwrap();
        assert!(matches!(store.create_order(address()), Err(StoreError::NotAuthenticated)));

        let mut store = customer_store();
        assert!(matches!(store.create_order(address()), Err(StoreError::Order(OrderError::NoItems))));
        store.add_product_to_cart(3, 1).unwrap();
        let mut bad = address();
        bad.city.clear();
        assert!(matches!(store.create_order(bad), Err(StoreError::Validation(_))));
        assert!(!store.cart().is_empty());
    }

    #[test]
    fn test_order_visibility_by_role() {
        assert!(demo_store().orders().is_empty());
        assert_eq!(customer_store().orders().len(), 2);

        let mut admin = admin_store();
        assert_eq!(admin.orders().len(), 2);
        admin.add_product_to_cart(9, 1).unwrap();
        admin.create_order(address()).unwrap();
        assert_eq!(admin.orders().len(), 3);
        let newest: Vec<OrderId> = admin.orders_with_status(Some(OrderStatus::Processing)).iter().map(|o| o.id()).collect();
        assert_eq!(newest, vec![3, 2]);
    }

    #[test]
    fn test_update_order_status() {
        let mut store = admin_store();
        assert_eq!(store.update_order_status(2, OrderStatus::Delivered).unwrap().status(), OrderStatus::Delivered);
        assert_eq!(store.update_order_status(1, OrderStatus::Cancelled).unwrap().status(), OrderStatus::Cancelled);
        assert!(matches!(store.update_order_status(9, OrderStatus::Delivered), Err(StoreError::OrderNotFound(9))));
        assert_eq!(store.take_events().len(), 2);
    }
}
