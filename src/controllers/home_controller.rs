use axum::{
    extract::{Extension, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::{
    auth::CurrentSession,
    controllers::{
        alerts_controller, charts_controller, screener_controller, sharing_controller,
        watchlist_controller,
    },
    models::Module,
    render,
    services::{auth_service::DISCLAIMER_COOKIE, session_service::Session},
    AppState,
};

pub fn disclaimer_pending(jar: &CookieJar) -> bool {
    jar.get(DISCLAIMER_COOKIE).is_none()
}

/// Body of a module. The dashboard is the charts view.
pub async fn module_body(state: &AppState, session: &Session, module: Module) -> Result<String, String> {
    match module {
        Module::Dashboard | Module::Charts => charts_controller::module_body(state, session).await,
        Module::Watchlist => watchlist_controller::module_body(state, session).await,
        Module::Alerts => alerts_controller::module_body(state, session).await,
        Module::Screener => screener_controller::module_body(state, session, &Default::default()).await,
        Module::Sharing => sharing_controller::module_body(state, session).await,
    }
}

/// Marks `module` active and renders it, framed unless it is an htmx swap.
pub async fn show_module(
    state: &AppState,
    headers: &HeaderMap,
    jar: &CookieJar,
    session: &Session,
    module: Module,
) -> Response {
    session.shell.write().await.active_module = module;

    let body = module_body(state, session, module).await;
    let mut res = render::respond(state, headers, session, module.title(), body, disclaimer_pending(jar)).await;

    if render::is_htmx(headers) {
        res.headers_mut()
            .insert("HX-Trigger", HeaderValue::from_static("moduleChanged"));
    }
    res
}

// GET /
pub async fn home(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    let module = session.shell.read().await.active_module;
    show_module(&state, &headers, &jar, &session, module).await
}

// GET /modules/:name
pub async fn get_module(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Path(name): Path<String>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    show_module(&state, &headers, &jar, &session, Module::parse(&name)).await
}

// GET /sidebar
pub async fn get_sidebar(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    let ctx = json!({ "sidebar": render::sidebar_ctx(&session).await });
    render::fragment(&state, "partials/sidebar", &ctx)
}

// POST /theme
pub async fn post_theme(
    headers: HeaderMap,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    {
        let mut shell = session.shell.write().await;
        shell.theme = shell.theme.toggled();
    }

    if render::is_htmx(&headers) {
        let mut h = HeaderMap::new();
        h.insert("HX-Refresh", HeaderValue::from_static("true"));
        return (StatusCode::OK, h, Html(String::new())).into_response();
    }
    Redirect::to("/").into_response()
}

pub async fn not_found(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Option<Extension<CurrentSession>>,
) -> Response {
    let body = match render::render_page(&state, "pages/not_found", &json!({})) {
        Ok(b) => b,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    };

    if render::is_htmx(&headers) {
        return (StatusCode::NOT_FOUND, Html(body)).into_response();
    }

    let page = match session {
        Some(Extension(CurrentSession(s))) => render::render_full(&state, &s, "404", body, false).await,
        None => render::render_bare(&state, "404", body),
    };

    match page {
        Ok(page) => (StatusCode::NOT_FOUND, Html(page)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Html("ok".to_string()))
}
