use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{FieldId, ReviewId, UserId},
    review::Review,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostReviewRequest {
    #[garde(range(min = 1, max = 5))]
    pub rating: i32,
    #[garde(length(min = 10, max = 1000))]
    pub comment: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub review_id: ReviewId,
    pub field_id: FieldId,
    pub reviewed_by: UserId,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(value: Review) -> Self {
        let Review {
            review_id,
            field_id,
            reviewed_by,
            reviewer_name,
            rating,
            comment,
            created_at,
        } = value;
        Self {
            review_id,
            field_id,
            reviewed_by,
            reviewer_name,
            rating,
            comment,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsResponse {
    pub items: Vec<ReviewResponse>,
}

impl From<Vec<Review>> for ReviewsResponse {
    fn from(value: Vec<Review>) -> Self {
        Self {
            items: value.into_iter().map(ReviewResponse::from).collect(),
        }
    }
}
