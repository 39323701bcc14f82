use axum::{
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::{
    auth::CurrentSession,
    render,
    services::{auth_service, session_service},
    AppState,
};

// GET /session/countdown
pub async fn get_countdown(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    let ctx = json!({ "countdown": render::countdown_ctx(&session).await });
    render::fragment(&state, "partials/countdown", &ctx)
}

// GET /ticker
pub async fn get_ticker(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    let ctx = json!({ "ticker": render::ticker_ctx(&*session.top_ticker.read().await) });
    render::fragment(&state, "partials/ticker", &ctx)
}

// POST /disclaimer/accept
pub async fn post_disclaimer_accept(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Response {
    let jar = jar.add(auth_service::disclaimer_cookie(&state.settings));

    if render::is_htmx(&headers) {
        // the modal swaps itself out
        return (jar, (StatusCode::OK, Html(String::new()))).into_response();
    }
    (jar, Redirect::to("/")).into_response()
}

// POST /disclaimer/decline
pub async fn post_disclaimer_decline(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    session_service::logout(&state, &session.id).await;
    let jar = jar.add(auth_service::clear_auth_cookie(&state.settings));

    if render::is_htmx(&headers) {
        return (jar, render::htmx_redirect("/login")).into_response();
    }
    (jar, Redirect::to("/login")).into_response()
}
