use crate::model::slot::TimeSlot;
use chrono::{Duration, NaiveDateTime};
use shared::error::{AppError, AppResult};

/// キャンセル期限。予約開始の 24 時間前を過ぎるとキャンセル不可。
pub const CANCELLATION_WINDOW_HOURS: i64 = 24;

/// キャンセル可否の判定。段階的な返金ティアは持たず、許可 / 拒否の二値。
pub fn ensure_cancellable(slot: &TimeSlot, now: NaiveDateTime) -> AppResult<()> {
    if slot.starts_at() - now > Duration::hours(CANCELLATION_WINDOW_HOURS) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition(
            "開始 24 時間前を過ぎているためキャンセルできません。".into(),
        ))
    }
}

/// 期限内にキャンセルされた支払い済み予約は返金対象として記録される。
/// 実際の返金（payment_status -> refunded）は後続の管理オペレーションで行う。
pub fn refund_obligation_note() -> &'static str {
    "Cancelled within policy window; paid amount is eligible for refund."
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn slot_starting_at(date: NaiveDate, hour: u32) -> TimeSlot {
        TimeSlot::new(
            date,
            NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(hour + 1, 0, 0).unwrap(),
        )
    }

    #[test]
    fn cancel_allowed_more_than_24_hours_ahead() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let slot = slot_starting_at(date, 15);
        // 開始 25 時間前
        let now = date
            .pred_opt()
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert!(ensure_cancellable(&slot, now).is_ok());
    }

    #[test]
    fn cancel_rejected_within_24_hours() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let slot = slot_starting_at(date, 15);
        // 開始 23 時間前
        let now = date
            .pred_opt()
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(16, 0, 0).unwrap());
        assert!(matches!(
            ensure_cancellable(&slot, now),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn cancel_rejected_exactly_at_boundary() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let slot = slot_starting_at(date, 15);
        // ちょうど 24 時間前は「24 時間より前」ではないので拒否
        let now = date
            .pred_opt()
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert!(ensure_cancellable(&slot, now).is_err());
    }
}
