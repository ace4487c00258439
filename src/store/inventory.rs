//! Stock levels and the movement audit trail.

use serde::Serialize;
use validator::Validate;

use super::{next_id, Store};
use crate::domain::aggregates::*;
use crate::domain::events::{DomainEvent, ProductEvent};
use crate::domain::value_objects::Money;
use crate::Result;

/// Recorded as the actor when nobody is signed in.
pub const SYSTEM_ACTOR: &str = "Admin User";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: Option<String>,
    pub current_stock: u32,
    pub status: StockStatus,
    /// Stock on hand at list price.
    pub stock_value: Money,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_items: usize,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub total_value: Money,
}

impl Store {
    pub fn stock_status(&self, product: &Product) -> StockStatus { product.stock_status(self.settings.low_stock_threshold) }

    /// One line per product, optionally narrowed to a single status.
    pub fn inventory_report(&self, status: Option<StockStatus>) -> Vec<InventoryLine> {
        self.products.iter()
            .map(|p| InventoryLine {
                product_id: p.id,
                product_name: p.name.clone(),
                category: self.category_by_id(p.category_id).map(|c| c.name.clone()),
                current_stock: p.stock.value(),
                status: self.stock_status(p),
                stock_value: p.price * p.stock.value(),
            })
            .filter(|line| status.map_or(true, |s| line.status == s))
            .collect()
    }

    pub fn inventory_stats(&self) -> InventoryStats {
        self.inventory_report(None).into_iter().fold(InventoryStats::default(), |mut stats, line| {
            stats.total_items += 1;
            match line.status {
                StockStatus::InStock => stats.in_stock += 1,
                StockStatus::LowStock => stats.low_stock += 1,
                StockStatus::OutOfStock => stats.out_of_stock += 1,
            }
            stats.total_value = stats.total_value + line.stock_value;
            stats
        })
    }

    /// Applies a stock adjustment and records the movement.
    pub fn adjust_stock(&mut self, product_id: ProductId, adjustment: StockAdjustment) -> Result<&StockMovement> {
        adjustment.validate()?;
        let index = self.product_index(product_id)?;
        let performed_by = self.current_user().map_or_else(|| SYSTEM_ACTOR.to_string(), |u| u.name.clone());
        let id = next_id(&self.stock_movements, |m| m.id);
        let movement = adjustment.apply_to(&mut self.products[index], id, Self::today(), performed_by);
        self.raise_event(DomainEvent::Product(ProductEvent::StockAdjusted {
            product_id, kind: movement.kind, previous_stock: movement.previous_stock, new_stock: movement.new_stock,
        }));
        tracing::info!(product_id, kind = ?movement.kind, previous = movement.previous_stock, new = movement.new_stock, "Stock adjusted");
        self.stock_movements.insert(0, movement);
        Ok(&self.stock_movements[0])
    }

    /// Movements, newest first.
    pub fn stock_movements(&self) -> &[StockMovement] { &self.stock_movements }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::StoreError;

    fn adjustment(kind: MovementKind, quantity: u32) -> StockAdjustment {
        StockAdjustment { kind, quantity, reason: "Stock Count".into(), notes: None }
    }

    #[test]
    fn test_stock_status_thresholds() {
        let store = demo_store();
        assert_eq!(store.stock_status(store.product_by_id(1).unwrap()), StockStatus::InStock);
        assert_eq!(store.stock_status(store.product_by_id(12).unwrap()), StockStatus::LowStock);
        assert_eq!(store.inventory_report(Some(StockStatus::OutOfStock)).len(), 0);
    }

    #[test]
    fn test_adjust_stock_kinds() {
        let mut store = admin_store();
        assert_eq!(store.adjust_stock(15, adjustment(MovementKind::In, 2)).unwrap().new_stock, 10);
        assert_eq!(store.adjust_stock(15, adjustment(MovementKind::Out, 50)).unwrap().new_stock, 0);
        let movement = store.adjust_stock(15, adjustment(MovementKind::Adjustment, 7)).unwrap();
        assert_eq!((movement.previous_stock, movement.new_stock), (0, 7));
        assert_eq!(movement.performed_by, "Admin");
        assert_eq!(movement.reference, "Manual Adjustment");

        let ids: Vec<u64> = store.stock_movements().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(store.product_by_id(15).unwrap().stock.value(), 7);
        assert_eq!(store.take_events().len(), 3);
    }

    #[test]
    fn test_adjust_stock_errors() {
        let mut store = demo_store();
        assert!(matches!(store.adjust_stock(404, adjustment(MovementKind::In, 1)), Err(StoreError::ProductNotFound(404))));
        let mut blank = adjustment(MovementKind::In, 1);
        blank.reason.clear();
        assert!(matches!(store.adjust_stock(1, blank), Err(StoreError::Validation(_))));
        assert_eq!(store.adjust_stock(1, adjustment(MovementKind::In, 1)).unwrap().performed_by, SYSTEM_ACTOR);
    }

    #[test]
    fn test_inventory_stats() {
        let store = demo_store();
        let stats = store.inventory_stats();
        assert_eq!(stats.total_items, 26);
        assert_eq!(stats.in_stock + stats.low_stock + stats.out_of_stock, 26);
        assert!(stats.total_value.is_positive());
    }
}
