//! Domain event publication over NATS.
//!
//! Events drained from the store are wrapped in a small envelope and
//! published to `storefront.events.<aggregate>.<event>`. Without a NATS
//! connection publishing is a no-op.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::events::DomainEvent;

pub const SUBJECT_PREFIX: &str = "storefront.events";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope<'a> {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub subject: String,
    pub event: &'a DomainEvent,
}

impl<'a> EventEnvelope<'a> {
    pub fn new(event: &'a DomainEvent) -> Self {
        Self { id: Uuid::new_v4(), occurred_at: Utc::now(), subject: format!("{SUBJECT_PREFIX}.{}", event.subject()), event }
    }
}

#[derive(Clone, Default)]
pub struct EventPublisher {
    nats: Option<async_nats::Client>,
}

impl EventPublisher {
    /// Connects when a URL is given. A failed connection is logged and
    /// leaves the publisher disabled.
    pub async fn connect(url: Option<&str>) -> Self {
        let Some(url) = url else { return Self::default() };
        match async_nats::connect(url).await {
            Ok(client) => {
                tracing::info!(url, "Connected to NATS");
                Self { nats: Some(client) }
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "NATS unavailable, domain events will not be published");
                Self::default()
            }
        }
    }

    pub fn is_enabled(&self) -> bool { self.nats.is_some() }

    /// Publishes each event; failures are logged and skipped.
    pub async fn publish_all(&self, events: Vec<DomainEvent>) {
        let Some(nats) = &self.nats else { return };
        for event in &events {
            let envelope = EventEnvelope::new(event);
            let payload = match serde_json::to_vec(&envelope) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!(subject = %envelope.subject, error = %e, "Failed to encode domain event");
                    continue;
                }
            };
            if let Err(e) = nats.publish(envelope.subject.clone(), payload.into()).await {
                tracing::warn!(subject = %envelope.subject, error = %e, "Failed to publish domain event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::OrderEvent;
    use crate::domain::value_objects::Money;

    #[test]
    fn test_envelope_shape() {
        let event = DomainEvent::Order(OrderEvent::Placed { order_id: 3, user_id: 1, total: Money::from_minor(196710) });
        let envelope = EventEnvelope::new(&event);
        assert_eq!(envelope.subject, "storefront.events.order.placed");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["event"]["aggregate"], "order");
        assert_eq!(json["event"]["event"]["type"], "placed");
        assert!(json["occurredAt"].is_string());
    }

    #[tokio::test]
    async fn test_disabled_publisher_is_noop() {
        let publisher = EventPublisher::connect(None).await;
        assert!(!publisher.is_enabled());
        publisher.publish_all(vec![]).await;
    }
}
