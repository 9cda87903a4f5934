use axum::{
    extract::{Path, State},
    Json,
};
use garde::Validate;
use kernel::model::{
    booking::{
        settlement::{self, Settlement},
        Booking, BookingStatus, PaymentMethod, PaymentStatus,
    },
    document::Document,
    id::BookingId,
};
use registry::AppRegistry;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::payment::{ConfirmPaymentRequest, ConfirmPaymentResponse, PaymentIntentResponse},
};

/// 決済確認。判定はカーネル側の純粋関数に委ね、ここでは
/// 予約・証憑の取得と結果の書き込みだけを行う。
pub async fn confirm_payment(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<ConfirmPaymentRequest>,
) -> AppResult<Json<ConfirmPaymentResponse>> {
    req.validate(&())?;

    let booking = fetch_booking(&registry, booking_id).await?;
    if !booking.is_owned_by(user.id()) && !user.is_admin() {
        return Err(AppError::ForbiddenOperation(
            "booking belongs to another user".into(),
        ));
    }

    let event = req.into_event(booking_id, &user.user);

    let proof: Option<Document> = match event.payment_proof {
        Some(document_id) => registry.document_repository().find_by_id(document_id).await?,
        None => None,
    };

    match settlement::settle(&booking, &event, proof.as_ref())? {
        Settlement::AlreadyProcessed => Ok(Json(ConfirmPaymentResponse::new(
            "Payment already processed for this transaction.",
            booking,
        ))),
        Settlement::Applied(update) => {
            let message = match update.payment_status {
                PaymentStatus::Paid => "Payment processed successfully. Your booking is confirmed!",
                _ => "Payment details recorded. Your booking is awaiting approval.",
            };
            registry
                .booking_repository()
                .apply_settlement(&event, update)
                .await?;
            let updated = fetch_booking(&registry, booking_id).await?;
            Ok(Json(ConfirmPaymentResponse::new(message, updated)))
        }
    }
}

/// カード決済用の intent を外部ゲートウェイに作成し、取引参照を
/// 予約に記録してから client secret を返す。
pub async fn create_payment_intent(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaymentIntentResponse>> {
    let booking = fetch_booking(&registry, booking_id).await?;
    if !booking.is_owned_by(user.id()) && !user.is_admin() {
        return Err(AppError::ForbiddenOperation(
            "booking belongs to another user".into(),
        ));
    }
    if booking.payment_method != PaymentMethod::Card {
        return Err(AppError::UnprocessableEntity(
            "booking is not payable by card".into(),
        ));
    }
    if booking.status != BookingStatus::Pending || booking.payment_status != PaymentStatus::Pending
    {
        return Err(AppError::InvalidTransition(
            "booking is not awaiting card payment".into(),
        ));
    }

    // ゲートウェイは最小通貨単位を要求する
    let amount_minor = (booking.amount.total * dec!(100))
        .round()
        .to_i64()
        .ok_or(AppError::ConversionEntityError(
            "booking amount out of range".into(),
        ))?;

    let intent = registry
        .payment_gateway()
        .create_intent(booking_id, amount_minor)
        .await?;

    registry
        .booking_repository()
        .record_gateway_reference(booking_id, intent.intent_id.clone())
        .await?;

    Ok(Json(PaymentIntentResponse {
        intent_id: intent.intent_id,
        client_secret: intent.client_secret,
        amount: booking.amount.total,
    }))
}

async fn fetch_booking(registry: &AppRegistry, booking_id: BookingId) -> AppResult<Booking> {
    registry
        .booking_repository()
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("予約（{}）が見つかりませんでした。", booking_id))
        })
}
