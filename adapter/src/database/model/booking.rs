use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use kernel::model::{
    availability::SlotOccupancy,
    booking::{Booking, BookingAmount, BookingStatus, PaymentMethod, PaymentStatus},
    id::{BookingId, DocumentId, FieldId, UserId},
    slot::TimeSlot,
};
use rust_decimal::Decimal;

#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub field_id: FieldId,
    pub user_id: UserId,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub amount_total: Decimal,
    pub amount_deposit: Option<Decimal>,
    pub amount_remaining: Option<Decimal>,
    pub payment_proof: Option<DocumentId>,
    pub gateway_reference: Option<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(value: BookingRow) -> Self {
        let BookingRow {
            booking_id,
            field_id,
            user_id,
            slot_date,
            start_time,
            end_time,
            status,
            payment_method,
            payment_status,
            amount_total,
            amount_deposit,
            amount_remaining,
            payment_proof,
            gateway_reference,
            notes,
            created_at,
            updated_at,
        } = value;
        Booking {
            booking_id,
            field_id,
            booked_by: user_id,
            slot: TimeSlot::new(slot_date, start_time, end_time),
            status,
            payment_method,
            payment_status,
            amount: BookingAmount {
                total: amount_total,
                deposit: amount_deposit,
                remaining: amount_remaining,
            },
            payment_proof,
            gateway_reference,
            notes,
            created_at,
            updated_at,
        }
    }
}

// 空き状況の射影と重複チェックに使う軽量の行
#[derive(sqlx::FromRow)]
pub struct OccupiedSlotRow {
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BookingStatus,
}

impl From<OccupiedSlotRow> for SlotOccupancy {
    fn from(value: OccupiedSlotRow) -> Self {
        let OccupiedSlotRow {
            slot_date,
            start_time,
            end_time,
            status,
        } = value;
        SlotOccupancy {
            slot: TimeSlot::new(slot_date, start_time, end_time),
            status,
        }
    }
}
