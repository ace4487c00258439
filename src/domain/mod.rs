//! Storefront domain model
pub mod value_objects;
pub mod aggregates;
pub mod events;
