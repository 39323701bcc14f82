use axum::{Router, routing::get};
use crate::{AppState, controllers::{charts_controller, realtime_controller}};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/ws/chart", get(charts_controller::ws_chart))
        .route("/events", get(realtime_controller::sse_events))
        .route("/events/public", get(realtime_controller::sse_public))
}
