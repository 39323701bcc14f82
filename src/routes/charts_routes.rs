use axum::{Router, routing::{get, post}};
use crate::{AppState, controllers::charts_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/charts", get(charts_controller::get_charts))
        .route("/charts/panel", get(charts_controller::get_chart_panel))
        .route("/charts/data", get(charts_controller::get_chart_data))
        .route("/charts/settings", post(charts_controller::post_chart_settings))
}
