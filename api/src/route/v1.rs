use super::{booking::build_booking_routers, field::build_field_routers};
use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_field_routers())
        .merge(build_booking_routers());
    Router::new().nest("/api/v1", router)
}
