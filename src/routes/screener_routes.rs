use axum::{Router, routing::get};
use crate::{AppState, controllers::screener_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/screener", get(screener_controller::get_screener))
        .route("/screener/results", get(screener_controller::get_results))
}
