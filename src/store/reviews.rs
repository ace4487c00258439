//! Product reviews. Append-only; ratings are always derived.

use validator::Validate;

use super::{next_id, Store};
use crate::domain::aggregates::*;
use crate::{Result, StoreError};

impl Store {
    pub fn reviews(&self, product_id: ProductId) -> Vec<&Review> {
        self.reviews.iter().filter(|r| r.product_id == product_id).collect()
    }

    /// Records a review by the signed-in user, dated today.
    pub fn add_review(&mut self, review: NewReview) -> Result<ReviewId> {
        review.validate()?;
        let (user_id, user_name) = self.require_user().map(|u| (u.id, u.name.clone()))?;
        if self.product_by_id(review.product_id).is_none() { return Err(StoreError::ProductNotFound(review.product_id)); }
        let id = next_id(&self.reviews, |r| r.id);
        let product_id = review.product_id;
        self.reviews.push(Review::from_new(id, user_id, user_name, Self::today(), review));
        tracing::info!(review_id = id, product_id, user_id, "Review added");
        Ok(id)
    }

    /// Mean rating for a product, 0 when it has no reviews.
    pub fn average_rating(&self, product_id: ProductId) -> f64 {
        average_rating(self.reviews.iter().filter(|r| r.product_id == product_id))
    }
}
