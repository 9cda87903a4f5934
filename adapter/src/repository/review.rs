use crate::database::{model::review::ReviewRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{FieldId, ReviewId},
    review::{event::CreateReview, Review},
};
use kernel::repository::review::ReviewRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct ReviewRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReviewRepository for ReviewRepositoryImpl {
    async fn create(&self, event: CreateReview) -> AppResult<ReviewId> {
        let mut tx = self.db.begin().await?;

        {
            //
            // ① フィールドの存在確認
            //
            let field: Option<(FieldId,)> =
                sqlx::query_as("SELECT field_id FROM fields WHERE field_id = $1")
                    .bind(event.field_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?;

            if field.is_none() {
                return Err(AppError::EntityNotFound(format!(
                    "フィールド（{}）が見つかりませんでした。",
                    event.field_id
                )));
            }

            //
            // ② 投稿者が completed な予約を持っているか
            //
            let (has_completed,): (bool,) = sqlx::query_as(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM bookings
                    WHERE field_id = $1 AND user_id = $2 AND status = 'completed'
                )
                "#,
            )
            .bind(event.field_id)
            .bind(event.reviewed_by)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if !has_completed {
                return Err(AppError::ForbiddenOperation(
                    "利用済み（completed）の予約があるユーザーのみレビューを投稿できます。"
                        .into(),
                ));
            }

            //
            // ③ 同一ユーザーの重複レビューを禁止
            //
            let (already,): (bool,) = sqlx::query_as(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM reviews
                    WHERE field_id = $1 AND user_id = $2
                )
                "#,
            )
            .bind(event.field_id)
            .bind(event.reviewed_by)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if already {
                return Err(AppError::UnprocessableEntity(
                    "このフィールドにはすでにレビューを投稿しています。".into(),
                ));
            }
        }

        let review_id = ReviewId::new();
        let res = sqlx::query(
            r#"
            INSERT INTO reviews (review_id, field_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(review_id)
        .bind(event.field_id)
        .bind(event.reviewed_by)
        .bind(event.rating)
        .bind(event.comment)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No review record has been created".into(),
            ));
        }

        // 評価の集計は全件から再計算する。書き込み頻度が低い前提の
        // 実装であり、増えてきたら逐次更新に置き換える余地がある
        sqlx::query(
            r#"
            UPDATE fields
            SET rating_average = (
                    SELECT COALESCE(ROUND(AVG(rating)::numeric, 1), 0)
                    FROM reviews WHERE field_id = $1
                ),
                rating_count = (
                    SELECT COUNT(*) FROM reviews WHERE field_id = $1
                ),
                updated_at = now()
            WHERE field_id = $1
            "#,
        )
        .bind(event.field_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(review_id)
    }

    async fn find_by_field(&self, field_id: FieldId) -> AppResult<Vec<Review>> {
        let rows: Vec<ReviewRow> = sqlx::query_as(
            r#"
            SELECT
                r.review_id,
                r.field_id,
                r.user_id,
                u.user_name,
                r.rating,
                r.comment,
                r.created_at
            FROM reviews AS r
            INNER JOIN users AS u ON r.user_id = u.user_id
            WHERE r.field_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(field_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Review::from).collect())
    }
}
