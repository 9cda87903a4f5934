use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    booking::{
        create_booking, delete_booking, show_booking, show_booking_list, update_booking_status,
    },
    payment::{confirm_payment, create_payment_intent},
};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let bookings_routers = Router::new()
        .route("/", post(create_booking))
        .route("/", get(show_booking_list))
        .route("/:booking_id", get(show_booking))
        .route("/:booking_id", delete(delete_booking))
        .route("/:booking_id/status", patch(update_booking_status))
        .route("/:booking_id/payment", post(confirm_payment))
        .route("/:booking_id/payment/intent", post(create_payment_intent));

    Router::new().nest("/bookings", bookings_routers)
}
