//! Back-office routes. Every handler requires a signed-in administrator.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLockReadGuard, RwLockWriteGuard};

use super::{reject, ApiResult, AppState, Created};
use crate::domain::aggregates::*;
use crate::store::{CustomerSummary, DashboardStats, DiscountFilter, InventoryLine, InventoryStats, Store};
use crate::StoreError;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route("/orders", get(list_orders))
        .route("/orders/:id/status", put(update_order_status))
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", axum::routing::delete(delete_user))
        .route("/users/:id/role", put(set_user_role))
        .route("/users/:id/summary", get(customer_summary))
        .route("/inventory", get(inventory_report))
        .route("/inventory/stats", get(inventory_stats))
        .route("/inventory/movements", get(stock_movements))
        .route("/inventory/:id/adjust", post(adjust_stock))
        .route("/discounts", get(list_discounts).post(create_discount))
        .route("/discounts/stats", get(discount_stats))
        .route("/discounts/usages", get(discount_usages))
        .route("/discounts/generate", post(generate_discounts))
        .route("/discounts/:id", get(get_discount).put(update_discount).delete(delete_discount))
        .route("/discounts/:id/toggle", post(toggle_discount))
        .route("/discounts/:id/duplicate", post(duplicate_discount))
}

async fn admin_read(s: &AppState) -> ApiResult<RwLockReadGuard<'_, Store>> {
    let store = s.store.read().await;
    store.require_admin().map_err(reject)?;
    Ok(store)
}

async fn admin_write(s: &AppState) -> ApiResult<RwLockWriteGuard<'_, Store>> {
    let store = s.store.write().await;
    store.require_admin().map_err(reject)?;
    Ok(store)
}

/// Releases the lock, then publishes whatever the mutation raised.
async fn publish_events(s: &AppState, mut store: RwLockWriteGuard<'_, Store>) {
    let events = store.take_events();
    drop(store);
    s.publish(events).await;
}

async fn dashboard(State(s): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(admin_read(&s).await?.dashboard_stats()))
}

// =============================================================================
// Products
// =============================================================================

async fn create_product(State(s): State<AppState>, Json(r): Json<ProductDraft>) -> ApiResult<(StatusCode, Json<Product>)> {
    let mut store = admin_write(&s).await?;
    let id = store.add_product(r).map_err(reject)?;
    let product = store.product_by_id(id).cloned().ok_or(StoreError::ProductNotFound(id)).map_err(reject)?;
    publish_events(&s, store).await;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(State(s): State<AppState>, Path(id): Path<ProductId>, Json(r): Json<ProductPatch>) -> ApiResult<Json<Product>> {
    let mut store = admin_write(&s).await?;
    let product = store.update_product(id, r).map_err(reject)?.clone();
    publish_events(&s, store).await;
    Ok(Json(product))
}

async fn delete_product(State(s): State<AppState>, Path(id): Path<ProductId>) -> ApiResult<StatusCode> {
    let mut store = admin_write(&s).await?;
    store.delete_product(id).map_err(reject)?;
    publish_events(&s, store).await;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct OrderParams { pub status: Option<OrderStatus> }

#[derive(Debug, Deserialize)]
pub struct StatusRequest { pub status: OrderStatus }

async fn list_orders(State(s): State<AppState>, Query(p): Query<OrderParams>) -> ApiResult<Json<Vec<Order>>> {
    let store = admin_read(&s).await?;
    Ok(Json(store.orders_with_status(p.status).into_iter().cloned().collect()))
}

async fn update_order_status(State(s): State<AppState>, Path(id): Path<OrderId>, Json(r): Json<StatusRequest>) -> ApiResult<Json<Order>> {
    let mut store = admin_write(&s).await?;
    let order = store.update_order_status(id, r.status).map_err(reject)?.clone();
    publish_events(&s, store).await;
    Ok(Json(order))
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserParams {
    pub search: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct NewUserRequest {
    #[serde(flatten)]
    pub registration: Registration,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest { pub role: Role }

async fn list_users(State(s): State<AppState>, Query(p): Query<UserParams>) -> ApiResult<Json<Vec<User>>> {
    let store = admin_read(&s).await?;
    Ok(Json(store.search_users(p.search.trim(), p.role).into_iter().cloned().collect()))
}

async fn create_user(State(s): State<AppState>, Json(r): Json<NewUserRequest>) -> ApiResult<(StatusCode, Json<Created<UserId>>)> {
    let id = admin_write(&s).await?.create_user(r.registration, r.role).map_err(reject)?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

async fn set_user_role(State(s): State<AppState>, Path(id): Path<UserId>, Json(r): Json<RoleRequest>) -> ApiResult<Json<User>> {
    let mut store = admin_write(&s).await?;
    let user = store.set_user_role(id, r.role).map_err(reject)?.clone();
    Ok(Json(user))
}

async fn delete_user(State(s): State<AppState>, Path(id): Path<UserId>) -> ApiResult<StatusCode> {
    admin_write(&s).await?.delete_user(id).map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn customer_summary(State(s): State<AppState>, Path(id): Path<UserId>) -> ApiResult<Json<CustomerSummary>> {
    admin_read(&s).await?.customer_summary(id).map(Json).map_err(reject)
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct InventoryParams { pub status: Option<StockStatus> }

async fn inventory_report(State(s): State<AppState>, Query(p): Query<InventoryParams>) -> ApiResult<Json<Vec<InventoryLine>>> {
    Ok(Json(admin_read(&s).await?.inventory_report(p.status)))
}

async fn inventory_stats(State(s): State<AppState>) -> ApiResult<Json<InventoryStats>> {
    Ok(Json(admin_read(&s).await?.inventory_stats()))
}

async fn stock_movements(State(s): State<AppState>) -> ApiResult<Json<Vec<StockMovement>>> {
    Ok(Json(admin_read(&s).await?.stock_movements().to_vec()))
}

async fn adjust_stock(State(s): State<AppState>, Path(id): Path<ProductId>, Json(r): Json<StockAdjustment>) -> ApiResult<(StatusCode, Json<StockMovement>)> {
    let mut store = admin_write(&s).await?;
    let movement = store.adjust_stock(id, r).map_err(reject)?.clone();
    publish_events(&s, store).await;
    Ok((StatusCode::CREATED, Json(movement)))
}

// =============================================================================
// Discounts
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountView {
    #[serde(flatten)]
    pub discount: Discount,
    pub status: DiscountStatus,
}

impl DiscountView {
    fn of(store: &Store, discount: &Discount) -> Self {
        Self { status: store.discount_status(discount), discount: discount.clone() }
    }
}

async fn list_discounts(State(s): State<AppState>, Query(filter): Query<DiscountFilter>) -> ApiResult<Json<Vec<DiscountView>>> {
    let store = admin_read(&s).await?;
    Ok(Json(store.filter_discounts(&filter).into_iter().map(|d| DiscountView::of(&store, d)).collect()))
}

async fn get_discount(State(s): State<AppState>, Path(id): Path<DiscountId>) -> ApiResult<Json<DiscountView>> {
    let store = admin_read(&s).await?;
    let discount = store.discount_by_id(id).ok_or(StoreError::DiscountNotFound(id)).map_err(reject)?;
    Ok(Json(DiscountView::of(&store, discount)))
}

async fn create_discount(State(s): State<AppState>, Json(r): Json<DiscountDraft>) -> ApiResult<(StatusCode, Json<DiscountView>)> {
    let mut store = admin_write(&s).await?;
    let discount = store.create_discount(r).map_err(reject)?.clone();
    Ok((StatusCode::CREATED, Json(DiscountView::of(&store, &discount))))
}

async fn update_discount(State(s): State<AppState>, Path(id): Path<DiscountId>, Json(r): Json<DiscountDraft>) -> ApiResult<Json<DiscountView>> {
    let mut store = admin_write(&s).await?;
    let discount = store.update_discount(id, r).map_err(reject)?.clone();
    Ok(Json(DiscountView::of(&store, &discount)))
}

async fn delete_discount(State(s): State<AppState>, Path(id): Path<DiscountId>) -> ApiResult<StatusCode> {
    admin_write(&s).await?.delete_discount(id).map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_discount(State(s): State<AppState>, Path(id): Path<DiscountId>) -> ApiResult<Json<DiscountView>> {
    let mut store = admin_write(&s).await?;
    store.toggle_discount(id).map_err(reject)?;
    let discount = store.discount_by_id(id).cloned().ok_or(StoreError::DiscountNotFound(id)).map_err(reject)?;
    Ok(Json(DiscountView::of(&store, &discount)))
}

async fn duplicate_discount(State(s): State<AppState>, Path(id): Path<DiscountId>) -> ApiResult<(StatusCode, Json<DiscountView>)> {
    let mut store = admin_write(&s).await?;
    let copy = store.duplicate_discount(id).map_err(reject)?.clone();
    Ok((StatusCode::CREATED, Json(DiscountView::of(&store, &copy))))
}

async fn discount_stats(State(s): State<AppState>) -> ApiResult<Json<DiscountStats>> {
    Ok(Json(admin_read(&s).await?.discount_stats()))
}

async fn discount_usages(State(s): State<AppState>) -> ApiResult<Json<Vec<DiscountUsage>>> {
    Ok(Json(admin_read(&s).await?.discount_usages().to_vec()))
}

async fn generate_discounts(State(s): State<AppState>, Json(r): Json<BulkDiscountRequest>) -> ApiResult<(StatusCode, Json<Vec<DiscountId>>)> {
    let ids = admin_write(&s).await?.generate_discount_codes(r).map_err(reject)?;
    Ok((StatusCode::CREATED, Json(ids)))
}
