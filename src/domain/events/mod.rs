//! Domain events
use serde::Serialize;
use crate::domain::aggregates::{MovementKind, OrderId, OrderStatus, ProductId, UserId};
use crate::domain::value_objects::Money;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "aggregate", content = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    Product(ProductEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductEvent {
    Created { product_id: ProductId },
    Updated { product_id: ProductId },
    Deleted { product_id: ProductId },
    StockAdjusted { product_id: ProductId, kind: MovementKind, previous_stock: u32, new_stock: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed { order_id: OrderId, user_id: UserId, total: Money },
    StatusChanged { order_id: OrderId, status: OrderStatus },
}

impl DomainEvent {
    /// Messaging subject, e.g. `order.placed`.
    pub fn subject(&self) -> String {
        let (aggregate, name) = match self {
            DomainEvent::Product(e) => ("product", match e {
                ProductEvent::Created { .. } => "created",
                ProductEvent::Updated { .. } => "updated",
                ProductEvent::Deleted { .. } => "deleted",
                ProductEvent::StockAdjusted { .. } => "stock_adjusted",
            }),
            DomainEvent::Order(e) => ("order", match e {
                OrderEvent::Placed { .. } => "placed",
                OrderEvent::StatusChanged { .. } => "status_changed",
            }),
        };
        format!("{aggregate}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_and_payload() {
        let event = DomainEvent::Order(OrderEvent::Placed { order_id: 3, user_id: 1, total: Money::from_minor(196710) });
        assert_eq!(event.subject(), "order.placed");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["aggregate"], "order");
        assert_eq!(json["event"]["type"], "placed");
        assert_eq!(json["event"]["order_id"], 3);
    }
}
