pub mod event;
pub mod policy;
pub mod settlement;

use crate::model::{
    id::{BookingId, DocumentId, FieldId, UserId},
    slot::{self, TimeSlot},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strum::EnumString;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, strum::Display, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// この状態の予約がカレンダー上の時間帯を占有し続けるか。
    /// rejected / cancelled のみが枠を解放する。
    pub fn blocks_slot(self) -> bool {
        !matches!(self, BookingStatus::Rejected | BookingStatus::Cancelled)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Rejected | BookingStatus::Cancelled | BookingStatus::Completed
        )
    }

    /// 状態遷移表。ここにない遷移はすべて拒否する。
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Pending, Completed)
                | (Approved, Cancelled)
                | (Approved, Completed)
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, strum::Display, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Card,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, strum::Display, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Partial,
    Refunded,
}

/// 請求額の内訳。銀行振込のみ 30% のデポジットを前払いする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingAmount {
    pub total: Decimal,
    pub deposit: Option<Decimal>,
    pub remaining: Option<Decimal>,
}

impl BookingAmount {
    pub fn calculate(price_per_hour: Decimal, slot: &TimeSlot, method: PaymentMethod) -> Self {
        let total = price_per_hour * slot::duration_hours(slot.start_time, slot.end_time);
        match method {
            PaymentMethod::BankTransfer => {
                let deposit = (total * dec!(0.30)).round_dp(2);
                Self {
                    total,
                    deposit: Some(deposit),
                    remaining: Some(total - deposit),
                }
            }
            _ => Self {
                total,
                deposit: None,
                remaining: None,
            },
        }
    }
}

#[derive(Debug)]
pub struct Booking {
    pub booking_id: BookingId,
    pub field_id: FieldId,
    pub booked_by: UserId,
    pub slot: TimeSlot,
    pub status: BookingStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub amount: BookingAmount,
    pub payment_proof: Option<DocumentId>,
    pub gateway_reference: Option<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.booked_by == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn slot(sh: u32, eh: u32) -> TimeSlot {
        TimeSlot::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(sh, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(eh, 0, 0).unwrap(),
        )
    }

    #[test]
    fn cash_amount_has_no_deposit() {
        let amount = BookingAmount::calculate(dec!(40), &slot(14, 16), PaymentMethod::Cash);
        assert_eq!(amount.total, dec!(80));
        assert_eq!(amount.deposit, None);
        assert_eq!(amount.remaining, None);
    }

    #[test]
    fn bank_transfer_splits_thirty_percent_deposit() {
        let amount =
            BookingAmount::calculate(dec!(40), &slot(14, 16), PaymentMethod::BankTransfer);
        assert_eq!(amount.total, dec!(80));
        assert_eq!(amount.deposit, Some(dec!(24.00)));
        assert_eq!(amount.remaining, Some(dec!(56.00)));
        assert_eq!(
            amount.deposit.unwrap() + amount.remaining.unwrap(),
            amount.total
        );
    }

    #[test]
    fn deposit_rounding_preserves_total() {
        // 端数の出る単価でも deposit + remaining == total を崩さない
        let amount =
            BookingAmount::calculate(dec!(33.33), &slot(10, 11), PaymentMethod::BankTransfer);
        assert_eq!(amount.total, dec!(33.33));
        assert_eq!(amount.deposit, Some(dec!(10.00)));
        assert_eq!(
            amount.deposit.unwrap() + amount.remaining.unwrap(),
            amount.total
        );
    }

    #[test]
    fn transition_table_allows_only_documented_moves() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Pending.can_transition_to(Completed));
        assert!(Approved.can_transition_to(Cancelled));
        assert!(Approved.can_transition_to(Completed));

        assert!(!Approved.can_transition_to(Pending));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Completed.can_transition_to(Cancelled));
    }

    #[test]
    fn only_rejected_and_cancelled_release_the_slot() {
        use BookingStatus::*;
        assert!(Pending.blocks_slot());
        assert!(Approved.blocks_slot());
        assert!(Completed.blocks_slot());
        assert!(!Rejected.blocks_slot());
        assert!(!Cancelled.blocks_slot());
    }
}
