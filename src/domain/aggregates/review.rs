//! Review Aggregate

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::domain::aggregates::product::ProductId;
use crate::domain::aggregates::user::UserId;

pub type ReviewId = u64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub user_name: String,
    pub rating: u8,
    pub title: String,
    pub comment: String,
    pub recommend: bool,
    pub date: NaiveDate,
}

/// A review as submitted from the product page; id and date are assigned on save.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub product_id: ProductId,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1))]
    pub comment: String,
    #[serde(default)]
    pub recommend: bool,
}

impl Review {
    pub fn from_new(id: ReviewId, user_id: UserId, user_name: String, date: NaiveDate, new: NewReview) -> Self {
        Self { id, product_id: new.product_id, user_id, user_name, rating: new.rating, title: new.title, comment: new.comment, recommend: new.recommend, date }
    }
}

/// Mean rating, or 0 when there are no reviews.
pub fn average_rating<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> f64 {
    let (sum, count) = reviews.into_iter().fold((0u32, 0u32), |(sum, count), r| (sum + u32::from(r.rating), count + 1));
    if count == 0 { 0.0 } else { f64::from(sum) / f64::from(count) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(id: ReviewId, rating: u8) -> Review {
        Review {
            id, product_id: 1, user_id: 1, user_name: "Reaksa".into(), rating, title: "Title".into(),
            comment: "Comment".into(), recommend: true, date: NaiveDate::from_ymd_opt(2025, 10, 15).unwrap(),
        }
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[review(1, 5), review(2, 4)]), 4.5);
        assert_eq!(average_rating(&Vec::<Review>::new()), 0.0);
    }

    #[test]
    fn test_rating_range() {
        let new = NewReview { product_id: 1, rating: 6, title: "Too good".into(), comment: "Off the scale".into(), recommend: true };
        assert!(new.validate().is_err());
        let new = NewReview { rating: 0, ..new };
        assert!(new.validate().is_err());
        let new = NewReview { rating: 3, ..new };
        assert!(new.validate().is_ok());
    }
}
