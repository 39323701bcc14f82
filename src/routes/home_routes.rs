use axum::{Router, routing::{get, post}};
use crate::{AppState, controllers::{home_controller, session_controller}};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/", get(home_controller::home))
        .route("/health", get(home_controller::health))
        .route("/modules/:name", get(home_controller::get_module))
        .route("/sidebar", get(home_controller::get_sidebar))
        .route("/theme", post(home_controller::post_theme))
        .route("/ticker", get(session_controller::get_ticker))
        .route("/session/countdown", get(session_controller::get_countdown))
        .route("/disclaimer/accept", post(session_controller::post_disclaimer_accept))
        .route("/disclaimer/decline", post(session_controller::post_disclaimer_decline))
}
