//! Store state holder
//!
//! `Store` is the single source of truth for the running session: catalog,
//! signed-in user, cart, wishlist, orders, reviews and the admin-side data.
//! Every operation is a synchronous mutation of process memory; the cart,
//! wishlist and UI flags are mirrored into [`Storage`] as a cache and read
//! back when a store is built.
//!
//! Two `tokio::sync::watch` channels publish the authentication flag and
//! the wishlist contents, so subscribers always see the latest value.

mod cart;
mod catalog;
mod dashboard;
mod discounts;
mod inventory;
mod orders;
mod query;
mod reviews;
mod seed;
mod session;
mod users;
mod wishlist;

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::aggregates::*;
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::Money;
use crate::storage::{self, Storage, CART_KEY};

pub use dashboard::DashboardStats;
pub use discounts::DiscountFilter;
pub use inventory::{InventoryLine, InventoryStats, SYSTEM_ACTOR};
pub use cart::CheckoutSummary;
pub use query::{Availability, DiscountLevel, ProductFilter, ProductListing, ProductSort};
pub use seed::SeedData;
pub use users::{CustomerSegment, CustomerSummary};

/// Tunables that differ between deployments.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreSettings {
    /// Flat shipping fee added at checkout.
    pub shipping_fee: Money,
    pub low_stock_threshold: u32,
}

impl Default for StoreSettings {
    fn default() -> Self { Self { shipping_fee: Money::from_minor(999), low_stock_threshold: LOW_STOCK_THRESHOLD } }
}

pub struct Store {
    products: Vec<Product>,
    categories: Vec<Category>,
    users: Vec<User>,
    orders: Vec<Order>,
    reviews: Vec<Review>,
    seeded_wishlist: Vec<(UserId, ProductId)>,
    discounts: Vec<Discount>,
    discount_usages: Vec<DiscountUsage>,
    stock_movements: Vec<StockMovement>,
    cart: Cart,
    current_user: Option<UserId>,
    auth_state: watch::Sender<bool>,
    wishlist: watch::Sender<Vec<ProductId>>,
    storage: Arc<dyn Storage>,
    settings: StoreSettings,
    events: Vec<DomainEvent>,
}

impl Store {
    /// Builds a signed-out store over `seed`, restoring the cached cart.
    pub fn new(seed: SeedData, storage: Arc<dyn Storage>, settings: StoreSettings) -> Self {
        let cart: Cart = storage::load_json(&*storage, CART_KEY);
        let (auth_state, _) = watch::channel(false);
        let (wishlist, _) = watch::channel(Vec::new());
        tracing::info!(products = seed.products.len(), users = seed.users.len(), cart_lines = cart.line_count(), "Store initialised");
        Self {
            products: seed.products,
            categories: seed.categories,
            users: seed.users,
            orders: seed.orders,
            reviews: seed.reviews,
            seeded_wishlist: seed.wishlist,
            discounts: seed.discounts,
            discount_usages: seed.discount_usages,
            stock_movements: Vec::new(),
            cart,
            current_user: None,
            auth_state,
            wishlist,
            storage,
            settings,
            events: Vec::new(),
        }
    }

    /// Store over the built-in demo catalog with default settings.
    pub fn with_demo_data(storage: Arc<dyn Storage>) -> Self { Self::new(SeedData::demo(), storage, StoreSettings::default()) }

    pub fn settings(&self) -> &StoreSettings { &self.settings }

    /// Drains the domain events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }

    fn raise_event(&mut self, event: DomainEvent) { self.events.push(event); }

    fn storage(&self) -> &dyn Storage { &*self.storage }

    fn today() -> NaiveDate { Utc::now().date_naive() }
}

/// `max(existing) + 1`, or 1 for an empty collection. Fine for a single
/// writer; not safe under concurrent inserts.
fn next_id<T>(items: &[T], id: impl Fn(&T) -> u64) -> u64 {
    items.iter().map(id).max().map_or(1, |max| max + 1)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(&[3u64, 9, 4], |n| *n), 10);
        assert_eq!(next_id(&Vec::<u64>::new(), |n| *n), 1);
    }

    #[test]
    fn test_store_starts_signed_out_with_catalog() {
        let store = test_support::demo_store();
        assert!(!store.is_authenticated());
        assert_eq!(store.products().len(), 26);
        assert_eq!(store.categories().len(), 11);
        assert!(store.cart().is_empty());
    }
}
