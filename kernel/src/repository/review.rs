use crate::model::{
    id::{FieldId, ReviewId},
    review::{event::CreateReview, Review},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// レビューを作成し、フィールドの評価集計を全件から再計算する。
    /// 投稿者は対象フィールドの completed な予約を持っていなければならない。
    async fn create(&self, event: CreateReview) -> AppResult<ReviewId>;
    async fn find_by_field(&self, field_id: FieldId) -> AppResult<Vec<Review>>;
}
