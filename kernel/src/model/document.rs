use crate::model::id::{BookingId, DocumentId, UserId};
use serde::{Deserialize, Serialize};
use strum::EnumString;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, strum::Display, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(type_name = "document_kind", rename_all = "snake_case")]
pub enum DocumentKind {
    Profile,
    PaymentProof,
    IdDocument,
    License,
    Other,
}

/// 外部のドキュメントストアに保存されたファイルのメタデータ。
/// 銀行振込の支払い証明の所有者・予約スコープ検証に使う。
#[derive(Debug)]
pub struct Document {
    pub document_id: DocumentId,
    pub owned_by: UserId,
    pub booking_id: Option<BookingId>,
    pub kind: DocumentKind,
    pub file_name: String,
}
