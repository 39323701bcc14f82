use axum::{Router, routing::{get, post}};
use crate::{AppState, controllers::sharing_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/sharing", get(sharing_controller::get_sharing))
        .route("/sharing/settings", post(sharing_controller::post_sharing_settings))
        .route("/share/:platform", get(sharing_controller::get_share))
}
