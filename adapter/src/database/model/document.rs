use kernel::model::{
    document::{Document, DocumentKind},
    id::{BookingId, DocumentId, UserId},
};

#[derive(sqlx::FromRow)]
pub struct DocumentRow {
    pub document_id: DocumentId,
    pub user_id: UserId,
    pub booking_id: Option<BookingId>,
    pub kind: DocumentKind,
    pub file_name: String,
}

impl From<DocumentRow> for Document {
    fn from(value: DocumentRow) -> Self {
        let DocumentRow {
            document_id,
            user_id,
            booking_id,
            kind,
            file_name,
        } = value;
        Document {
            document_id,
            owned_by: user_id,
            booking_id,
            kind,
            file_name,
        }
    }
}
