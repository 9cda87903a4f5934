use chrono::{DateTime, Utc};
use kernel::model::{
    id::{FieldId, ReviewId, UserId},
    review::Review,
};

#[derive(sqlx::FromRow)]
pub struct ReviewRow {
    pub review_id: ReviewId,
    pub field_id: FieldId,
    pub user_id: UserId,
    pub user_name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(value: ReviewRow) -> Self {
        let ReviewRow {
            review_id,
            field_id,
            user_id,
            user_name,
            rating,
            comment,
            created_at,
        } = value;
        Review {
            review_id,
            field_id,
            reviewed_by: user_id,
            reviewer_name: user_name,
            rating,
            comment,
            created_at,
        }
    }
}
