use crate::database::{model::field::FieldRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    field::{event::CreateField, Field},
    id::FieldId,
};
use kernel::repository::field::FieldRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct FieldRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl FieldRepository for FieldRepositoryImpl {
    async fn create(&self, event: CreateField) -> AppResult<FieldId> {
        let field_id = FieldId::new();
        let res = sqlx::query(
            r#"
            INSERT INTO fields
            (field_id, name, description, address, price_per_hour, surface, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'active')
            "#,
        )
        .bind(field_id)
        .bind(event.name)
        .bind(event.description)
        .bind(event.address)
        .bind(event.price_per_hour)
        .bind(event.surface)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No field record has been created".into(),
            ));
        }

        Ok(field_id)
    }

    async fn find_active_all(&self) -> AppResult<Vec<Field>> {
        let rows: Vec<FieldRow> = sqlx::query_as(
            r#"
            SELECT
                field_id, name, description, address,
                price_per_hour, surface, status,
                rating_average, rating_count
            FROM fields
            WHERE status = 'active'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Field::from).collect())
    }

    async fn find_by_id(&self, field_id: FieldId) -> AppResult<Option<Field>> {
        let row: Option<FieldRow> = sqlx::query_as(
            r#"
            SELECT
                field_id, name, description, address,
                price_per_hour, surface, status,
                rating_average, rating_count
            FROM fields
            WHERE field_id = $1
            "#,
        )
        .bind(field_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Field::from))
    }
}
