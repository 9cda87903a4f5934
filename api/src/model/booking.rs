use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use garde::Validate;
use kernel::model::{
    availability::SlotOccupancy,
    booking::{Booking, BookingAmount, BookingStatus, PaymentMethod, PaymentStatus},
    id::{BookingId, DocumentId, FieldId, UserId},
    slot::{self, TimeSlot},
};
use kernel::repository::booking::BookingListOptions;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[garde(skip)]
    pub field_id: FieldId,
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(pattern(r"^([01][0-9]|2[0-3]):[0-5][0-9]$"))]
    pub start_time: String,
    #[garde(pattern(r"^([01][0-9]|2[0-3]):[0-5][0-9]$"))]
    pub end_time: String,
    #[garde(skip)]
    pub payment_method: PaymentMethod,
    #[garde(inner(length(max = 500)))]
    pub notes: Option<String>,
}

impl CreateBookingRequest {
    /// 時間帯の妥当性検証。ここを通った TimeSlot だけが予約作成に進む。
    /// フィールドの存在確認・重複確認はリポジトリのトランザクション内で行う。
    pub fn build_slot(&self, now: NaiveDateTime) -> AppResult<TimeSlot> {
        if self.date < now.date() {
            return Err(AppError::UnprocessableEntity(
                "booking date cannot be in the past".into(),
            ));
        }

        let start_time = slot::parse_time(&self.start_time)
            .ok_or_else(|| AppError::UnprocessableEntity("invalid time format".into()))?;
        let end_time = slot::parse_time(&self.end_time)
            .ok_or_else(|| AppError::UnprocessableEntity("invalid time format".into()))?;

        if start_time >= end_time {
            return Err(AppError::UnprocessableEntity(
                "end time must be after start time".into(),
            ));
        }

        let slot = TimeSlot::new(self.date, start_time, end_time);
        if slot.starts_at() <= now {
            return Err(AppError::UnprocessableEntity(
                "cannot book past time slots".into(),
            ));
        }

        Ok(slot)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<BookingListQuery> for BookingListOptions {
    fn from(value: BookingListQuery) -> Self {
        let BookingListQuery {
            status,
            limit,
            offset,
        } = value;
        Self {
            status,
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBookingsQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotResponse {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

impl From<TimeSlot> for TimeSlotResponse {
    fn from(value: TimeSlot) -> Self {
        Self {
            date: value.date,
            start_time: value.start_time.format("%H:%M").to_string(),
            end_time: value.end_time.format("%H:%M").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountResponse {
    pub total: rust_decimal::Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit: Option<rust_decimal::Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<rust_decimal::Decimal>,
}

impl From<BookingAmount> for AmountResponse {
    fn from(value: BookingAmount) -> Self {
        Self {
            total: value.total,
            deposit: value.deposit,
            remaining: value.remaining,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub field_id: FieldId,
    pub booked_by: UserId,
    pub time_slot: TimeSlotResponse,
    pub status: BookingStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub amount: AmountResponse,
    pub payment_proof: Option<DocumentId>,
    pub gateway_reference: Option<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id,
            field_id,
            booked_by,
            slot,
            status,
            payment_method,
            payment_status,
            amount,
            payment_proof,
            gateway_reference,
            notes,
            created_at,
            updated_at,
        } = value;
        Self {
            booking_id,
            field_id,
            booked_by,
            time_slot: slot.into(),
            status,
            payment_method,
            payment_status,
            amount: amount.into(),
            payment_proof,
            gateway_reference,
            notes,
            created_at,
            updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(value: Vec<Booking>) -> Self {
        Self {
            items: value.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

/// フィールド + 日付に対する占有中の時間帯（予約者情報は含めない）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyResponse {
    pub time_slot: TimeSlotResponse,
    pub status: BookingStatus,
}

impl From<SlotOccupancy> for OccupancyResponse {
    fn from(value: SlotOccupancy) -> Self {
        Self {
            time_slot: value.slot.into(),
            status: value.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupanciesResponse {
    pub items: Vec<OccupancyResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn request(date: NaiveDate, start: &str, end: &str) -> CreateBookingRequest {
        CreateBookingRequest {
            field_id: FieldId::new(),
            date,
            start_time: start.into(),
            end_time: end.into(),
            payment_method: PaymentMethod::Cash,
            notes: None,
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap())
    }

    #[test]
    fn time_pattern_rejects_malformed_strings() {
        let date = now().date().succ_opt().unwrap();
        for bad in ["24:00", "12:60", "9:00", "noon"] {
            let req = request(date, bad, "18:00");
            assert!(req.validate(&()).is_err(), "{bad} should fail validation");
        }
        assert!(request(date, "18:00", "19:00").validate(&()).is_ok());
    }

    #[test]
    fn past_date_is_rejected() {
        let yesterday = now().date().pred_opt().unwrap();
        let err = request(yesterday, "18:00", "19:00").build_slot(now());
        assert!(matches!(err, Err(AppError::UnprocessableEntity(_))));
    }

    #[test]
    fn inverted_interval_is_rejected() {
        let tomorrow = now().date().succ_opt().unwrap();
        assert!(request(tomorrow, "19:00", "18:00").build_slot(now()).is_err());
        assert!(request(tomorrow, "18:00", "18:00").build_slot(now()).is_err());
    }

    #[test]
    fn todays_elapsed_slot_is_rejected() {
        // 日付は今日で startTime がすでに過ぎているケース
        let err = request(now().date(), "11:00", "12:00").build_slot(now());
        assert!(matches!(err, Err(AppError::UnprocessableEntity(_))));

        // 未来の時刻なら同日でも通る
        assert!(request(now().date(), "18:00", "19:00")
            .build_slot(now())
            .is_ok());
    }

    #[test]
    fn list_query_clamps_pagination() {
        let options: BookingListOptions = BookingListQuery {
            status: None,
            limit: Some(1000),
            offset: Some(-5),
        }
        .into();
        assert_eq!(options.limit, 100);
        assert_eq!(options.offset, 0);

        let defaults: BookingListOptions = BookingListQuery {
            status: None,
            limit: None,
            offset: None,
        }
        .into();
        assert_eq!(defaults.limit, 20);
        assert_eq!(defaults.offset, 0);
    }
}
