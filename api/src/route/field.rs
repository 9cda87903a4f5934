use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    booking::field_bookings,
    field::{field_availability, register_field, show_field, show_field_list},
    review::{list_reviews, post_review},
};

pub fn build_field_routers() -> Router<AppRegistry> {
    let fields_routers = Router::new()
        .route("/", post(register_field))
        .route("/", get(show_field_list))
        .route("/:field_id", get(show_field))
        .route("/:field_id/availability", get(field_availability))
        .route("/:field_id/bookings", get(field_bookings))
        .route("/:field_id/reviews", post(post_review))
        .route("/:field_id/reviews", get(list_reviews));

    Router::new().nest("/fields", fields_routers)
}
