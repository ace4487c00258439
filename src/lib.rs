//! Storefront State Service
//!
//! In-memory state holder behind an electronics storefront and its admin
//! back office. One `Store` owns the whole session.
//!
//! ## Features
//! - Product catalog browsing, search, filtering and pagination
//! - Shopping cart and checkout with frozen order snapshots
//! - Per-user wishlist with change notifications
//! - Reviews and derived ratings
//! - Admin: products, orders, users, inventory movements, discount codes
//! - Local-storage style caching of cart, wishlist and UI flags

use thiserror::Error;
use validator::ValidationErrors;

pub mod config;
pub mod domain;
pub mod events;
pub mod http;
pub mod storage;
pub mod store;

pub use domain::aggregates::*;
pub use domain::events::{DomainEvent, OrderEvent, ProductEvent};
pub use domain::value_objects::{DiscountCode, DiscountCodeError, DiscountPercent, Money, Page, PageRequest, Quantity};
pub use store::{SeedData, Store, StoreSettings};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Discount not found: {0}")]
    DiscountNotFound(DiscountId),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Administrator access required")]
    Forbidden,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Discount code already exists: {0}")]
    DuplicateDiscountCode(String),

    #[error("Unknown discount code: {0}")]
    UnknownDiscountCode(String),

    #[error("Discount code cannot be used right now: {0}")]
    DiscountNotRedeemable(String),

    #[error("An administrator cannot delete their own account")]
    SelfDeletion,

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    DiscountCode(#[from] DiscountCodeError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

pub type Result<T> = std::result::Result<T, StoreError>;
