use crate::model::id::{FieldId, UserId};
use derive_new::new;

#[derive(Debug, new)]
pub struct CreateReview {
    pub field_id: FieldId,
    pub reviewed_by: UserId,
    pub rating: i32,
    pub comment: String,
}
