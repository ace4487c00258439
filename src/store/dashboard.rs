//! Back-office dashboard figures.

use serde::Serialize;

use super::Store;
use crate::domain::aggregates::*;
use crate::domain::value_objects::Money;

const RECENT_LIMIT: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_orders: usize,
    pub total_users: usize,
    pub total_revenue: Money,
    /// Orders still `Processing`.
    pub pending_orders: usize,
    /// Products with fewer than ten units left.
    pub low_stock_products: usize,
    pub recent_orders: Vec<Order>,
    pub recent_products: Vec<Product>,
    pub recent_customers: Vec<User>,
}

impl Store {
    pub fn dashboard_stats(&self) -> DashboardStats {
        let mut recent_orders: Vec<&Order> = self.orders.iter().collect();
        recent_orders.sort_by(|a, b| b.date().cmp(&a.date()).then(b.id().cmp(&a.id())));
        let mut recent_products: Vec<&Product> = self.products.iter().collect();
        recent_products.sort_by(|a, b| b.id.cmp(&a.id));

        DashboardStats {
            total_products: self.products.len(),
            total_orders: self.orders.len(),
            total_users: self.users.len(),
            total_revenue: self.orders.iter().map(Order::total).sum(),
            pending_orders: self.orders.iter().filter(|o| o.status() == OrderStatus::Processing).count(),
            low_stock_products: self.products.iter().filter(|p| p.stock.value() < LOW_STOCK_THRESHOLD).count(),
            recent_orders: recent_orders.into_iter().take(RECENT_LIMIT).cloned().collect(),
            recent_products: recent_products.into_iter().take(RECENT_LIMIT).cloned().collect(),
            recent_customers: self.users.iter().filter(|u| u.role == Role::Customer).take(RECENT_LIMIT).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_dashboard_over_seed() {
        let stats = demo_store().dashboard_stats();
        assert_eq!(stats.total_products, 26);
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_revenue, Money::from_major(1698));
        assert_eq!(stats.pending_orders, 1);
        // PlayStation 5, Canon EOS R5, DJI Mavic, LG OLED, Razer Blade
        assert_eq!(stats.low_stock_products, 5);
        assert_eq!(stats.recent_orders.iter().map(Order::id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(stats.recent_products[0].id, 26);
        assert_eq!(stats.recent_customers.len(), 1);
    }

    #[test]
    fn test_new_order_counts_as_pending_revenue() {
        let mut store = customer_store();
        store.add_product_to_cart(13, 2).unwrap();
        store.create_order(address()).unwrap();
        let stats = store.dashboard_stats();
        assert_eq!(stats.pending_orders, 2);
        assert_eq!(stats.total_revenue, Money::from_major(1698 + 498));
        assert_eq!(stats.recent_orders[0].id(), 3);
    }
}
