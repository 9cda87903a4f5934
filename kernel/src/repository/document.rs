use crate::model::{document::Document, id::DocumentId};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn find_by_id(&self, document_id: DocumentId) -> AppResult<Option<Document>>;
}
