use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use garde::Validate;
use kernel::model::{
    booking::{
        event::{CreateBooking, DeleteBooking, UpdateBookingStatus},
        policy, Booking, BookingStatus, PaymentStatus,
    },
    id::{BookingId, FieldId},
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::booking::{
        BookingListQuery, BookingResponse, BookingsResponse, CreateBookingRequest,
        FieldBookingsQuery, OccupanciesResponse, UpdateBookingStatusRequest,
    },
};

pub async fn create_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate(&())?;

    let now = Local::now().naive_local();
    let slot = req.build_slot(now)?;

    let event = CreateBooking::new(
        req.field_id,
        user.id(),
        slot,
        req.payment_method,
        req.notes.unwrap_or_default(),
    );
    let booking_id = registry.booking_repository().create(event).await?;

    let booking = fetch_booking(&registry, booking_id).await?;
    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

pub async fn show_booking_list(
    user: AuthorizedUser,
    Query(query): Query<BookingListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    let bookings = registry
        .booking_repository()
        .find_by_user(user.id(), query.into())
        .await?;
    Ok(Json(bookings.into()))
}

pub async fn show_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    let booking = fetch_booking(&registry, booking_id).await?;
    ensure_visible(&user, &booking)?;
    Ok(Json(booking.into()))
}

/// 指定日の占有中の時間帯だけを返す。誰が予約したかは開示しない。
pub async fn field_bookings(
    _user: AuthorizedUser,
    Path(field_id): Path<FieldId>,
    Query(query): Query<FieldBookingsQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<OccupanciesResponse>> {
    let occupancies = registry
        .booking_repository()
        .find_occupied_slots(field_id, query.date)
        .await?;
    Ok(Json(OccupanciesResponse {
        items: occupancies.into_iter().map(Into::into).collect(),
    }))
}

pub async fn update_booking_status(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateBookingStatusRequest>,
) -> AppResult<Json<BookingResponse>> {
    let booking = fetch_booking(&registry, booking_id).await?;
    ensure_visible(&user, &booking)?;

    // 一般ユーザーに許すのはキャンセルのみ。承認・拒否・完了は管理側の操作。
    if !user.is_admin() && req.status != BookingStatus::Cancelled {
        return Err(AppError::ForbiddenOperation(
            "only administrators can approve, reject or complete bookings".into(),
        ));
    }

    if !booking.status.can_transition_to(req.status) {
        return Err(AppError::InvalidTransition(format!(
            "cannot change booking from {} to {}",
            booking.status, req.status
        )));
    }

    // キャンセル期限は利用者側の都合キャンセルにのみ適用する
    if req.status == BookingStatus::Cancelled && !user.is_admin() {
        policy::ensure_cancellable(&booking.slot, Local::now().naive_local())?;
    }

    // 支払い済みの予約をキャンセルする場合は返金対象であることを記録する
    let note = (req.status == BookingStatus::Cancelled
        && matches!(
            booking.payment_status,
            PaymentStatus::Paid | PaymentStatus::Partial
        ))
    .then(|| format!("\n{}", policy::refund_obligation_note()));

    let event = UpdateBookingStatus::new(booking_id, user.id(), req.status, note);
    registry
        .booking_repository()
        .update_status(event, booking.status)
        .await?;

    let updated = fetch_booking(&registry, booking_id).await?;
    Ok(Json(updated.into()))
}

pub async fn delete_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let event = DeleteBooking::new(booking_id, user.id());
    registry.booking_repository().delete(event).await?;
    Ok(StatusCode::NO_CONTENT)
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

fn ensure_visible(user: &AuthorizedUser, booking: &Booking) -> AppResult<()> {
    if booking.is_owned_by(user.id()) || user.is_admin() {
        Ok(())
    } else {
        Err(AppError::ForbiddenOperation(
            "booking belongs to another user".into(),
        ))
    }
}
