use garde::Validate;
use kernel::model::{
    booking::{
        event::ConfirmPayment,
        Booking, PaymentMethod,
    },
    id::{BookingId, DocumentId},
    user::User,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    #[garde(skip)]
    pub payment_method: PaymentMethod,
    #[garde(custom(non_negative))]
    pub amount: Decimal,
    #[garde(skip)]
    pub payment_proof: Option<DocumentId>,
    #[garde(inner(length(min = 1, max = 255)))]
    pub gateway_reference: Option<String>,
    #[garde(inner(length(max = 500)))]
    pub notes: Option<String>,
}

fn non_negative(value: &Decimal, _ctx: &()) -> garde::Result {
    if value.is_sign_negative() {
        return Err(garde::Error::new("must not be negative"));
    }
    Ok(())
}

impl ConfirmPaymentRequest {
    pub fn into_event(self, booking_id: BookingId, user: &User) -> ConfirmPayment {
        ConfirmPayment::new(
            booking_id,
            user.user_id,
            self.payment_method,
            self.amount,
            self.payment_proof,
            self.gateway_reference,
            self.notes,
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentResponse {
    pub message: String,
    pub booking: super::booking::BookingResponse,
}

impl ConfirmPaymentResponse {
    pub fn new(message: impl Into<String>, booking: Booking) -> Self {
        Self {
            message: message.into(),
            booking: booking.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub intent_id: String,
    pub client_secret: String,
    pub amount: Decimal,
}
