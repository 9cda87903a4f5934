pub mod event;

use crate::model::id::FieldId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::EnumString;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, strum::Display, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(type_name = "field_status", rename_all = "snake_case")]
pub enum FieldStatus {
    Active,
    Inactive,
    Maintenance,
}

impl FieldStatus {
    /// 予約を受け付けられるのは active のフィールドのみ。
    pub fn is_bookable(self) -> bool {
        matches!(self, FieldStatus::Active)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, strum::Display, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(type_name = "field_surface", rename_all = "snake_case")]
pub enum Surface {
    Grass,
    Artificial,
    Concrete,
}

#[derive(Debug)]
pub struct Field {
    pub field_id: FieldId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub price_per_hour: Decimal,
    pub surface: Surface,
    pub status: FieldStatus,
    pub rating: RatingSummary,
}

/// レビューから再計算される評価の集計値。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingSummary {
    pub average: Decimal,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_fields_accept_bookings() {
        assert!(FieldStatus::Active.is_bookable());
        assert!(!FieldStatus::Inactive.is_bookable());
        assert!(!FieldStatus::Maintenance.is_bookable());
    }
}
