//! JSON API over a shared [`Store`].
//!
//! The store models a single browser session, so every request sees the
//! same signed-in user. Storefront routes live under `/api/v1`, back-office
//! routes under `/api/v1/admin`.

mod admin;
mod storefront;

use axum::{http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::domain::aggregates::OrderError;
use crate::domain::events::DomainEvent;
use crate::events::EventPublisher;
use crate::store::Store;
use crate::StoreError;

pub type ApiResult<T> = std::result::Result<T, (StatusCode, String)>;

/// Body returned when a resource is created by id.
#[derive(Debug, Serialize)]
pub struct Created<T> { pub id: T }

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub publisher: Arc<EventPublisher>,
}

impl AppState {
    pub fn new(store: Store, publisher: EventPublisher) -> Self {
        Self { store: Arc::new(RwLock::new(store)), publisher: Arc::new(publisher) }
    }

    async fn publish(&self, events: Vec<DomainEvent>) {
        if !events.is_empty() { self.publisher.publish_all(events).await; }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront-state"})) }))
        .nest("/api/v1", storefront::routes())
        .nest("/api/v1/admin", admin::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub(crate) fn reject(err: StoreError) -> (StatusCode, String) {
    let status = match &err {
        StoreError::ProductNotFound(_)
        | StoreError::CategoryNotFound(_)
        | StoreError::OrderNotFound(_)
        | StoreError::UserNotFound(_)
        | StoreError::DiscountNotFound(_)
        | StoreError::UnknownDiscountCode(_) => StatusCode::NOT_FOUND,
        StoreError::NotAuthenticated | StoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        StoreError::Forbidden | StoreError::SelfDeletion => StatusCode::FORBIDDEN,
        StoreError::EmailTaken(_)
        | StoreError::DuplicateDiscountCode(_)
        | StoreError::DiscountNotRedeemable(_) => StatusCode::CONFLICT,
        StoreError::Validation(_)
        | StoreError::Cart(_)
        | StoreError::DiscountCode(_)
        | StoreError::Order(OrderError::NoItems) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    if status.is_client_error() { tracing::debug!(%status, error = %err, "Request rejected"); }
    (status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::CartError;

    #[test]
    fn test_reject_status_codes() {
        assert_eq!(reject(StoreError::ProductNotFound(9)).0, StatusCode::NOT_FOUND);
        assert_eq!(reject(StoreError::NotAuthenticated).0, StatusCode::UNAUTHORIZED);
        assert_eq!(reject(StoreError::SelfDeletion).0, StatusCode::FORBIDDEN);
        assert_eq!(reject(StoreError::DiscountNotRedeemable("WELCOME10".into())).0, StatusCode::CONFLICT);
        assert_eq!(reject(StoreError::Order(OrderError::NoItems)).0, StatusCode::UNPROCESSABLE_ENTITY);
        let (status, message) = reject(StoreError::Cart(CartError::InvalidQuantity));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(message, "Quantity must be at least 1");
    }
}
