use crate::model::{
    booking::{BookingStatus, PaymentMethod},
    id::{BookingId, DocumentId, FieldId, UserId},
    slot::TimeSlot,
};
use derive_new::new;
use rust_decimal::Decimal;

#[derive(Debug, new)]
pub struct CreateBooking {
    pub field_id: FieldId,
    pub booked_by: UserId,
    pub slot: TimeSlot,
    pub payment_method: PaymentMethod,
    pub notes: String,
}

#[derive(Debug, new)]
pub struct UpdateBookingStatus {
    pub booking_id: BookingId,
    pub requested_user: UserId,
    pub new_status: BookingStatus,
    // 遷移に伴って予約の記録に残す付記（返金対象の明記など）
    pub note: Option<String>,
}

#[derive(Debug, new)]
pub struct DeleteBooking {
    pub booking_id: BookingId,
    pub requested_user: UserId,
}

/// 支払い方法ごとの確認ペイロード。amount は改竄防止のため
/// 予約に保存された総額と完全一致しなければならない。
#[derive(Debug, new)]
pub struct ConfirmPayment {
    pub booking_id: BookingId,
    pub requested_user: UserId,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
    pub payment_proof: Option<DocumentId>,
    pub gateway_reference: Option<String>,
    pub notes: Option<String>,
}
