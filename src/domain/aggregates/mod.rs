//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;
pub mod user;
pub mod review;
pub mod discount;
pub mod inventory;

pub use product::{Category, CategoryId, Product, ProductDraft, ProductId, ProductPatch, StockStatus, LOW_STOCK_THRESHOLD};
pub use order::{Order, OrderError, OrderId, OrderItem, OrderStatus, ShippingAddress};
pub use cart::{Cart, CartError, CartItem};
pub use user::{PasswordChange, ProfileUpdate, Registration, Role, User, UserId};
pub use review::{average_rating, NewReview, Review, ReviewId};
pub use discount::{BulkDiscountRequest, Discount, DiscountDraft, DiscountId, DiscountKind, DiscountStats, DiscountStatus, DiscountUsage};
pub use inventory::{MovementKind, StockAdjustment, StockMovement};
