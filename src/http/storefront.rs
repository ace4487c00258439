//! Shopper-facing routes: catalog, session, cart, wishlist, orders, reviews.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{reject, ApiResult, AppState, Created};
use crate::domain::aggregates::*;
use crate::domain::value_objects::{Money, Page, PageRequest};
use crate::store::{Availability, CheckoutSummary, DiscountLevel, ProductFilter, ProductListing, ProductSort};
use crate::StoreError;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(browse_products))
        .route("/products/featured", get(featured_products))
        .route("/products/discounted", get(discounted_products))
        .route("/products/:id", get(get_product))
        .route("/products/:id/reviews", get(list_reviews))
        .route("/categories", get(list_categories))
        .route("/categories/:id/products", get(category_products))
        .route("/brands", get(list_brands))
        .route("/reviews", post(add_review))
        .route("/auth/session", get(session))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/register", post(register))
        .route("/account/profile", get(get_profile).put(update_profile))
        .route("/account/password", put(change_password))
        .route("/account/preferences", get(get_preferences).put(update_preferences))
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/items", post(add_to_cart))
        .route("/cart/items/:product_id", put(update_cart_item).delete(remove_from_cart))
        .route("/cart/summary", get(checkout_summary))
        .route("/cart/discount/:code", get(preview_discount))
        .route("/wishlist", get(get_wishlist))
        .route("/wishlist/:product_id", post(add_to_wishlist).delete(remove_from_wishlist))
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order))
}

// =============================================================================
// Catalog
// =============================================================================

/// Shop page query string. `brands` is comma separated; `discount` is
/// `any`, `none` or a minimum percentage.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShopParams {
    pub search: Option<String>,
    pub category: Option<CategoryId>,
    pub max_price: Option<Money>,
    pub brands: Option<String>,
    pub min_rating: Option<f64>,
    pub availability: Availability,
    pub discount: Option<String>,
    pub sort: ProductSort,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ShopParams {
    fn filter(&self) -> ApiResult<ProductFilter> {
        let discount = match self.discount.as_deref().map(str::trim) {
            None | Some("") | Some("any") => DiscountLevel::Any,
            Some("none") => DiscountLevel::None,
            Some(pct) => DiscountLevel::AtLeast(pct.parse().map_err(|_| (StatusCode::BAD_REQUEST, format!("Invalid discount filter: {pct}")))?),
        };
        let brands = self.brands.as_deref()
            .map(|b| b.split(',').map(str::trim).filter(|b| !b.is_empty()).map(String::from).collect())
            .unwrap_or_default();
        Ok(ProductFilter {
            search: self.search.clone(),
            category_id: self.category,
            max_price: self.max_price,
            brands,
            min_rating: self.min_rating,
            availability: self.availability,
            discount,
        })
    }

    fn page(&self) -> PageRequest {
        let default = PageRequest::default();
        PageRequest::new(self.page.unwrap_or(default.page), self.per_page.unwrap_or(default.per_page))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub listing: ProductListing,
    pub category: Option<Category>,
    pub in_wishlist: bool,
    pub reviews: Vec<ReviewView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,
    pub avatar: String,
}

async fn browse_products(State(s): State<AppState>, Query(p): Query<ShopParams>) -> ApiResult<Json<Page<ProductListing>>> {
    let filter = p.filter()?;
    let store = s.store.read().await;
    Ok(Json(store.browse(&filter, p.sort, p.page())))
}

async fn featured_products(State(s): State<AppState>) -> Json<Vec<ProductListing>> {
    let store = s.store.read().await;
    Json(store.featured_products().into_iter().map(|p| store.listing(p)).collect())
}

async fn discounted_products(State(s): State<AppState>) -> Json<Vec<ProductListing>> {
    let store = s.store.read().await;
    Json(store.discounted_products().into_iter().map(|p| store.listing(p)).collect())
}

async fn get_product(State(s): State<AppState>, Path(id): Path<ProductId>) -> ApiResult<Json<ProductDetail>> {
    let store = s.store.read().await;
    let product = store.product_by_id(id).ok_or(StoreError::ProductNotFound(id)).map_err(reject)?;
    Ok(Json(ProductDetail {
        listing: store.listing(product),
        category: store.category_by_id(product.category_id).cloned(),
        in_wishlist: store.is_in_wishlist(id),
        reviews: review_views(&store, id),
    }))
}

async fn list_reviews(State(s): State<AppState>, Path(id): Path<ProductId>) -> ApiResult<Json<Vec<ReviewView>>> {
    let store = s.store.read().await;
    if store.product_by_id(id).is_none() { return Err(reject(StoreError::ProductNotFound(id))); }
    Ok(Json(review_views(&store, id)))
}

fn review_views(store: &crate::Store, product_id: ProductId) -> Vec<ReviewView> {
    store.reviews(product_id).into_iter()
        .map(|r| ReviewView { avatar: store.avatar_for(r.user_id).to_string(), review: r.clone() })
        .collect()
}

async fn list_categories(State(s): State<AppState>) -> Json<Vec<Category>> {
    Json(s.store.read().await.categories().to_vec())
}

async fn category_products(State(s): State<AppState>, Path(id): Path<CategoryId>) -> ApiResult<Json<Vec<ProductListing>>> {
    let store = s.store.read().await;
    if store.category_by_id(id).is_none() { return Err(reject(StoreError::CategoryNotFound(id))); }
    Ok(Json(store.products_by_category(id).into_iter().map(|p| store.listing(p)).collect()))
}

async fn list_brands(State(s): State<AppState>) -> Json<Vec<String>> {
    Json(s.store.read().await.brands())
}

async fn add_review(State(s): State<AppState>, Json(r): Json<NewReview>) -> ApiResult<(StatusCode, Json<Created<ReviewId>>)> {
    let id = s.store.write().await.add_review(r).map_err(reject)?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

// =============================================================================
// Session and account
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub authenticated: bool,
    pub is_admin: bool,
    pub user: Option<User>,
}

impl SessionView {
    fn of(store: &crate::Store) -> Self {
        Self { authenticated: store.is_authenticated(), is_admin: store.is_admin(), user: store.current_user().cloned() }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

async fn session(State(s): State<AppState>) -> Json<SessionView> {
    Json(SessionView::of(&*s.store.read().await))
}

async fn login(State(s): State<AppState>, Json(r): Json<LoginRequest>) -> ApiResult<Json<SessionView>> {
    let mut store = s.store.write().await;
    if !store.login(&r.email, &r.password) { return Err(reject(StoreError::InvalidCredentials)); }
    store.set_remember_me(r.remember_me);
    Ok(Json(SessionView::of(&store)))
}

async fn logout(State(s): State<AppState>) -> StatusCode {
    s.store.write().await.logout();
    StatusCode::NO_CONTENT
}

async fn register(State(s): State<AppState>, Json(r): Json<Registration>) -> ApiResult<(StatusCode, Json<SessionView>)> {
    let mut store = s.store.write().await;
    store.register(r).map_err(reject)?;
    Ok((StatusCode::CREATED, Json(SessionView::of(&store))))
}

async fn get_profile(State(s): State<AppState>) -> ApiResult<Json<User>> {
    let store = s.store.read().await;
    let user = store.require_user().map_err(reject)?.clone();
    Ok(Json(user))
}

async fn update_profile(State(s): State<AppState>, Json(r): Json<ProfileUpdate>) -> ApiResult<Json<User>> {
    let mut store = s.store.write().await;
    let user = store.update_profile(r).map_err(reject)?.clone();
    Ok(Json(user))
}

async fn change_password(State(s): State<AppState>, Json(r): Json<PasswordChange>) -> ApiResult<StatusCode> {
    s.store.write().await.change_password(r).map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub remember_me: Option<bool>,
    pub admin_sidebar_collapsed: Option<bool>,
}

async fn get_preferences(State(s): State<AppState>) -> Json<Preferences> {
    let store = s.store.read().await;
    Json(Preferences { remember_me: Some(store.remember_me()), admin_sidebar_collapsed: Some(store.admin_sidebar_collapsed()) })
}

async fn update_preferences(State(s): State<AppState>, Json(r): Json<Preferences>) -> Json<Preferences> {
    let mut store = s.store.write().await;
    if let Some(remember) = r.remember_me { store.set_remember_me(remember); }
    if let Some(collapsed) = r.admin_sidebar_collapsed { store.set_admin_sidebar_collapsed(collapsed); }
    Json(Preferences { remember_me: Some(store.remember_me()), admin_sidebar_collapsed: Some(store.admin_sidebar_collapsed()) })
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub item_count: u32,
    pub total: Money,
}

impl CartView {
    fn of(store: &crate::Store) -> Self {
        Self { items: store.cart().items().to_vec(), item_count: store.cart_item_count(), total: store.cart_total() }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 { 1 }

#[derive(Debug, Deserialize)]
pub struct QuantityRequest { pub quantity: u32 }

async fn get_cart(State(s): State<AppState>) -> Json<CartView> {
    Json(CartView::of(&*s.store.read().await))
}

async fn add_to_cart(State(s): State<AppState>, Json(r): Json<AddToCartRequest>) -> ApiResult<Json<CartView>> {
    let mut store = s.store.write().await;
    store.add_product_to_cart(r.product_id, r.quantity).map_err(reject)?;
    Ok(Json(CartView::of(&store)))
}

async fn update_cart_item(State(s): State<AppState>, Path(product_id): Path<ProductId>, Json(r): Json<QuantityRequest>) -> Json<CartView> {
    let mut store = s.store.write().await;
    store.update_cart_item_quantity(product_id, r.quantity);
    Json(CartView::of(&store))
}

async fn remove_from_cart(State(s): State<AppState>, Path(product_id): Path<ProductId>) -> Json<CartView> {
    let mut store = s.store.write().await;
    store.remove_from_cart(product_id);
    Json(CartView::of(&store))
}

async fn clear_cart(State(s): State<AppState>) -> StatusCode {
    s.store.write().await.clear_cart();
    StatusCode::NO_CONTENT
}

async fn checkout_summary(State(s): State<AppState>) -> Json<CheckoutSummary> {
    Json(s.store.read().await.checkout_summary())
}

async fn preview_discount(State(s): State<AppState>, Path(code): Path<String>) -> ApiResult<Json<CheckoutSummary>> {
    s.store.read().await.preview_discount(&code).map(Json).map_err(reject)
}

// =============================================================================
// Wishlist
// =============================================================================

async fn get_wishlist(State(s): State<AppState>) -> Json<Vec<ProductListing>> {
    let store = s.store.read().await;
    Json(store.wishlist_products().into_iter().map(|p| store.listing(p)).collect())
}

async fn add_to_wishlist(State(s): State<AppState>, Path(product_id): Path<ProductId>) -> ApiResult<Json<Vec<ProductId>>> {
    let mut store = s.store.write().await;
    store.require_user().map_err(reject)?;
    if store.product_by_id(product_id).is_none() { return Err(reject(StoreError::ProductNotFound(product_id))); }
    store.add_to_wishlist(product_id);
    Ok(Json(store.wishlist()))
}

async fn remove_from_wishlist(State(s): State<AppState>, Path(product_id): Path<ProductId>) -> Json<Vec<ProductId>> {
    let mut store = s.store.write().await;
    store.remove_from_wishlist(product_id);
    Json(store.wishlist())
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest { pub shipping_address: ShippingAddress }

async fn list_orders(State(s): State<AppState>) -> ApiResult<Json<Vec<Order>>> {
    let store = s.store.read().await;
    store.require_user().map_err(reject)?;
    Ok(Json(store.orders_with_status(None).into_iter().cloned().collect()))
}

async fn create_order(State(s): State<AppState>, Json(r): Json<CreateOrderRequest>) -> ApiResult<(StatusCode, Json<Order>)> {
    let mut store = s.store.write().await;
    let id = store.create_order(r.shipping_address).map_err(reject)?;
    let order = store.order_by_id(id).cloned().ok_or(StoreError::OrderNotFound(id)).map_err(reject)?;
    let events = store.take_events();
    drop(store);
    s.publish(events).await;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Customers may only read their own orders.
async fn get_order(State(s): State<AppState>, Path(id): Path<OrderId>) -> ApiResult<Json<Order>> {
    let store = s.store.read().await;
    let user = store.require_user().map_err(reject)?;
    let order = store.order_by_id(id).ok_or(StoreError::OrderNotFound(id)).map_err(reject)?;
    if !user.is_admin() && order.user_id() != user.id { return Err(reject(StoreError::Forbidden)); }
    Ok(Json(order.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_params_to_filter() {
        let params = ShopParams { brands: Some("Apple, Sony,".into()), discount: Some("20".into()), ..Default::default() };
        let filter = params.filter().unwrap();
        assert_eq!(filter.brands, vec!["Apple", "Sony"]);
        assert_eq!(filter.discount, DiscountLevel::AtLeast(20));
        assert_eq!(params.page(), PageRequest::default());

        let none = ShopParams { discount: Some("none".into()), ..Default::default() };
        assert_eq!(none.filter().unwrap().discount, DiscountLevel::None);
        let bad = ShopParams { discount: Some("lots".into()), ..Default::default() };
        assert_eq!(bad.filter().unwrap_err().0, StatusCode::BAD_REQUEST);
    }
}
