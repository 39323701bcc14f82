use axum::{
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::CurrentSession,
    render::{self, fmt2, fmt_signed2, trend},
    services::{auth_service, session_service, ticker_service::LoginTicker},
    AppState,
};

fn selected_listing(jar: &CookieJar) -> Option<String> {
    jar.get(auth_service::LISTING_COOKIE).map(|c| c.value().to_string())
}

pub fn login_ticker_ctx(t: &LoginTicker, selected: Option<&str>) -> serde_json::Value {
    let current = t.quote(selected);

    let listings: Vec<serde_json::Value> = t
        .listings()
        .iter()
        .map(|l| {
            json!({
                "symbol": l.symbol,
                "exchange": l.exchange,
                "selected": l.symbol == current.symbol,
            })
        })
        .collect();

    json!({
        "listings": listings,
        "current": {
            "symbol": current.symbol,
            "exchange": current.exchange,
            "currency": current.currency,
            "price": fmt2(current.price),
            "change": fmt_signed2(current.change),
            "change_percent": fmt_signed2(current.change_percent),
            "trend": trend(current.change),
            "last_update": current.last_update,
        },
    })
}

// ---------------- LOGIN ----------------

pub async fn get_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    session: Option<Extension<CurrentSession>>,
) -> Response {
    if session.is_some() {
        return Redirect::to("/").into_response();
    }

    let selected = selected_listing(&jar);
    let ticker = login_ticker_ctx(&*state.login_ticker.read().await, selected.as_deref());
    let ticker_html = match render::render_page(&state, "partials/login_ticker", &ticker) {
        Ok(s) => s,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    };

    let body = match render::render_page(&state, "pages/login", &json!({ "ticker_html": ticker_html })) {
        Ok(s) => s,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    };

    if render::is_htmx(&headers) {
        return (StatusCode::OK, Html(body)).into_response();
    }

    match render::render_bare(&state, "Login", body) {
        Ok(page) => (StatusCode::OK, Html(page)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}

/// There is nothing to check: after the fixed delay every attempt succeeds.
pub async fn post_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Response {
    let session = session_service::login(&state).await;

    let token = match auth_service::make_session_token(&state.settings, &session.id) {
        Ok(t) => t,
        Err(e) => {
            session_service::logout(&state, &session.id).await;
            tracing::error!("failed to sign session token: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("token error: {e}")),
            )
                .into_response();
        }
    };

    let jar = jar.add(auth_service::auth_cookie(&state.settings, token));

    if render::is_htmx(&headers) {
        return (jar, render::htmx_redirect("/")).into_response();
    }
    (jar, Redirect::to("/")).into_response()
}

// ---------------- LOGOUT ----------------

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    session: Option<Extension<CurrentSession>>,
) -> Response {
    if let Some(Extension(CurrentSession(s))) = session {
        session_service::logout(&state, &s.id).await;
    }

    let jar = jar.add(auth_service::clear_auth_cookie(&state.settings));

    if render::is_htmx(&headers) {
        return (jar, render::htmx_redirect("/login")).into_response();
    }
    (jar, Redirect::to("/login")).into_response()
}

// ---------------- LOGIN TICKER ----------------

// GET /login/ticker
pub async fn get_login_ticker(State(state): State<AppState>, jar: CookieJar) -> Response {
    let selected = selected_listing(&jar);
    let ctx = login_ticker_ctx(&*state.login_ticker.read().await, selected.as_deref());
    render::fragment(&state, "partials/login_ticker", &ctx)
}

#[derive(Deserialize)]
pub struct SelectListingForm {
    pub symbol: String,
}

// POST /login/ticker
// The choice is remembered per visitor; unknown symbols keep the previous one.
pub async fn post_login_ticker(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SelectListingForm>,
) -> Response {
    let ticker = state.login_ticker.read().await;

    let (jar, selected) = match ticker.find(&form.symbol) {
        Some(l) => {
            let symbol = l.symbol.clone();
            (jar.add(auth_service::listing_cookie(&state.settings, &symbol)), Some(symbol))
        }
        None => {
            let prev = selected_listing(&jar);
            (jar, prev)
        }
    };

    let ctx = login_ticker_ctx(&ticker, selected.as_deref());
    (jar, render::fragment(&state, "partials/login_ticker", &ctx)).into_response()
}
