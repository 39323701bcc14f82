use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    error::SessionError,
    services::{auth_service, session_service::Session},
    AppState,
};

/// The live session behind the request's cookie.
#[derive(Clone)]
pub struct CurrentSession(pub Arc<Session>);

fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    for part in raw.split(';') {
        let part = part.trim();
        let mut it = part.splitn(2, '=');
        let (Some(k), Some(v)) = (it.next(), it.next()) else {
            continue;
        };
        let (k, v) = (k.trim(), v.trim());
        if k == name {
            return Some(v.to_string());
        }
    }
    None
}

pub async fn resolve_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Arc<Session>, SessionError> {
    let token = get_cookie(headers, &state.settings.jwt_cookie_name)
        .filter(|t| !t.is_empty())
        .ok_or(SessionError::MissingCookie)?;

    let session_id = auth_service::decode_session_token(&state.settings, &token)?;

    let session = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| SessionError::NotFound(session_id.clone()))?;

    if !session.is_authenticated().await {
        return Err(SessionError::Expired);
    }

    Ok(session)
}

pub async fn inject_current_session(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    match resolve_session(&state, req.headers()).await {
        Ok(session) => {
            req.extensions_mut().insert(CurrentSession(session));
        }
        Err(SessionError::MissingCookie) => {}
        Err(e) => tracing::debug!("no session for request: {}", e),
    }

    next.run(req).await
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn is_websocket(headers: &HeaderMap) -> bool {
    headers
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("websocket"))
        .unwrap_or(false)
}

fn is_public_path(path: &str) -> bool {
    path == "/login"
        || path == "/login/ticker"
        || path == "/logout"
        || path == "/health"
        || path == "/events/public"
        || path == "/favicon.ico"
        || path.starts_with("/static/")
}

pub async fn require_auth(
    State(_state): State<AppState>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let path = req.uri().path();

    if is_public_path(path) {
        return next.run(req).await;
    }

    if req.extensions().get::<CurrentSession>().is_some() {
        return next.run(req).await;
    }

    // Not logged in:
    // - HTMX: force full redirect to /login
    // - Normal: 303 redirect to /login
    // - WebSocket: 401
    if is_websocket(req.headers()) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    if is_htmx(req.headers()) {
        let mut headers = HeaderMap::new();
        headers.insert("HX-Redirect", HeaderValue::from_static("/login"));
        return (StatusCode::OK, headers, Html("".to_string())).into_response();
    }

    Redirect::to("/login").into_response()
}
