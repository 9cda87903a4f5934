pub mod event;

use crate::model::id::{FieldId, ReviewId, UserId};
use chrono::{DateTime, Utc};

#[derive(Debug)]
pub struct Review {
    pub review_id: ReviewId,
    pub field_id: FieldId,
    pub reviewed_by: UserId,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
