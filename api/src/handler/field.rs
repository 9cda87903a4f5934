use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate};
use garde::Validate;
use kernel::model::{
    availability,
    field::{event::CreateField, Field},
    id::FieldId,
    slot::TimeSlot,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::field::{
        AvailabilityQuery, AvailabilityResponse, DayAvailabilityResponse, FieldResponse,
        FieldsResponse, RegisterFieldRequest,
    },
};

pub async fn register_field(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<RegisterFieldRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation(
            "only administrators can register fields".into(),
        ));
    }
    req.validate(&())?;

    let field_id = registry
        .field_repository()
        .create(CreateField {
            name: req.name,
            description: req.description,
            address: req.address,
            price_per_hour: req.price_per_hour,
            surface: req.surface,
        })
        .await?;

    let field = registry
        .field_repository()
        .find_by_id(field_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!(
                "フィールド（{}）が見つかりませんでした。",
                field_id
            ))
        })?;

    Ok((StatusCode::CREATED, Json(FieldResponse::from(field))))
}

pub async fn show_field_list(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<FieldsResponse>> {
    let fields = registry.field_repository().find_active_all().await?;
    Ok(Json(fields.into()))
}

pub async fn show_field(
    _user: AuthorizedUser,
    Path(field_id): Path<FieldId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<FieldResponse>> {
    let field = fetch_visible_field(&registry, field_id).await?;
    Ok(Json(field.into()))
}

/// フィールドの日別空き状況。デフォルトは今日から 1 週間分。
pub async fn field_availability(
    _user: AuthorizedUser,
    Path(field_id): Path<FieldId>,
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailabilityResponse>> {
    let field = fetch_visible_field(&registry, field_id).await?;

    let now = Local::now().naive_local();
    let (from, to) = query.resolve_range(now.date())?;

    let mut days: Vec<DayAvailabilityResponse> = Vec::new();
    let mut date: NaiveDate = from;
    while date <= to {
        let occupied: Vec<TimeSlot> = registry
            .booking_repository()
            .find_occupied_slots(field_id, date)
            .await?
            .into_iter()
            .map(|o| o.slot)
            .collect();
        let day = availability::project_day(date, field.price_per_hour, &occupied, now);
        days.push(day.into());
        let Some(next) = date.succ_opt() else { break };
        date = next;
    }

    Ok(Json(AvailabilityResponse { field_id, days }))
}

/// 利用者向けの参照系では一覧と同様、active でないフィールドは
/// 存在しないものとして扱う。
async fn fetch_visible_field(registry: &AppRegistry, field_id: FieldId) -> AppResult<Field> {
    let field = registry
        .field_repository()
        .find_by_id(field_id)
        .await?
        .filter(|f| f.status.is_bookable());
    field.ok_or_else(|| {
        AppError::EntityNotFound(format!(
            "フィールド（{}）が見つかりませんでした。",
            field_id
        ))
    })
}
