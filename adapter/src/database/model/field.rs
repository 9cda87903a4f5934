use kernel::model::{
    field::{Field, FieldStatus, RatingSummary, Surface},
    id::FieldId,
};
use rust_decimal::Decimal;

#[derive(sqlx::FromRow)]
pub struct FieldRow {
    pub field_id: FieldId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub price_per_hour: Decimal,
    pub surface: Surface,
    pub status: FieldStatus,
    pub rating_average: Decimal,
    pub rating_count: i64,
}

impl From<FieldRow> for Field {
    fn from(value: FieldRow) -> Self {
        let FieldRow {
            field_id,
            name,
            description,
            address,
            price_per_hour,
            surface,
            status,
            rating_average,
            rating_count,
        } = value;
        Field {
            field_id,
            name,
            description,
            address,
            price_per_hour,
            surface,
            status,
            rating: RatingSummary {
                average: rating_average,
                count: rating_count,
            },
        }
    }
}

// 予約作成時の事前チェックに使う行
#[derive(sqlx::FromRow)]
pub struct FieldGuardRow {
    pub field_id: FieldId,
    pub status: FieldStatus,
    pub price_per_hour: Decimal,
}
