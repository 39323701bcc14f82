use axum::{Router, routing::get};
use crate::{AppState, controllers::auth_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/login", get(auth_controller::get_login).post(auth_controller::post_login))
        .route("/login/ticker", get(auth_controller::get_login_ticker).post(auth_controller::post_login_ticker))
        .route("/logout", get(auth_controller::logout))
}
