use crate::database::{model::document::DocumentRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{document::Document, id::DocumentId};
use kernel::repository::document::DocumentRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct DocumentRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl DocumentRepository for DocumentRepositoryImpl {
    async fn find_by_id(&self, document_id: DocumentId) -> AppResult<Option<Document>> {
        let row: Option<DocumentRow> = sqlx::query_as(
            r#"
            SELECT document_id, user_id, booking_id, kind, file_name
            FROM documents
            WHERE document_id = $1
            "#,
        )
        .bind(document_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Document::from))
    }
}
