use axum::{Router, routing::{get, post}};
use crate::{AppState, controllers::watchlist_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/watchlist", get(watchlist_controller::get_watchlist).post(watchlist_controller::post_add))
        .route("/watchlist/rows", get(watchlist_controller::get_rows))
        .route("/watchlist/search", get(watchlist_controller::get_search))
        .route("/watchlist/:symbol/favorite", post(watchlist_controller::post_favorite))
        .route("/watchlist/:symbol/delete", post(watchlist_controller::post_delete))
}
