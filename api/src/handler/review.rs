use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use garde::Validate;
use kernel::model::{id::FieldId, review::event::CreateReview};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::review::{PostReviewRequest, ReviewsResponse},
};

pub async fn post_review(
    user: AuthorizedUser,
    Path(field_id): Path<FieldId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<PostReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate(&())?;

    let event = CreateReview::new(field_id, user.id(), req.rating, req.comment);
    let review_id = registry.review_repository().create(event).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "reviewId": review_id })),
    ))
}

pub async fn list_reviews(
    _user: AuthorizedUser,
    Path(field_id): Path<FieldId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReviewsResponse>> {
    let reviews = registry.review_repository().find_by_field(field_id).await?;
    Ok(Json(reviews.into()))
}
