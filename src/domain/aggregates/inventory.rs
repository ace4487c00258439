//! Inventory movements

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::domain::aggregates::product::{Product, ProductId};
use crate::domain::value_objects::Quantity;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Goods received; adds to stock.
    In,
    /// Goods removed; subtracts, never below zero.
    Out,
    /// Stock count correction; sets the level outright.
    Adjustment,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    #[serde(rename = "adjustmentType")]
    pub kind: MovementKind,
    pub quantity: u32,
    #[validate(length(min = 1))]
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: u64,
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub quantity: u32,
    pub previous_stock: u32,
    pub new_stock: u32,
    pub reason: String,
    pub date: NaiveDate,
    pub performed_by: String,
    pub reference: String,
}

impl StockAdjustment {
    /// Stock level after applying this adjustment to `current`.
    pub fn resulting_stock(&self, current: Quantity) -> Quantity {
        match self.kind {
            MovementKind::In => current.add(self.quantity),
            MovementKind::Out => current.drain(self.quantity),
            MovementKind::Adjustment => Quantity::new(self.quantity),
        }
    }

    /// Applies the adjustment to `product` and returns the audit record.
    pub fn apply_to(self, product: &mut Product, id: u64, date: NaiveDate, performed_by: impl Into<String>) -> StockMovement {
        let previous = product.stock;
        product.stock = self.resulting_stock(previous);
        StockMovement {
            id, product_id: product.id, product_name: product.name.clone(), kind: self.kind, quantity: self.quantity,
            previous_stock: previous.value(), new_stock: product.stock.value(), reason: self.reason, date,
            performed_by: performed_by.into(),
            reference: self.notes.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| "Manual Adjustment".into()),
        }
    }
}
