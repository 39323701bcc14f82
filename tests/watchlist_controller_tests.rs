use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use http_body_util::BodyExt;
use investordesk::{config, routes, services::{auth_service, session_service::Session}, AppState};
use tower::ServiceExt;

fn test_state() -> AppState {
    let mut settings = config::load();
    settings.login_delay_ms = 0;
    AppState::new(settings).expect("templates")
}

async fn signed_in(state: &AppState) -> (Arc<Session>, String) {
    let session = state.sessions.create(state.settings.session_timeout_secs).await;
    let token = auth_service::make_session_token(&state.settings, &session.id).unwrap();
    (session, format!("{}={}", state.settings.jwt_cookie_name, token))
}

async fn response_body_string(res: Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

async fn get(state: &AppState, uri: &str, cookie: &str) -> Response {
    let req = Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header("HX-Request", "true")
        .body(Body::empty())
        .unwrap();
    routes::app(state.clone()).oneshot(req).await.unwrap()
}

async fn post_form(state: &AppState, uri: &str, cookie: &str, body: &str) -> Response {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header("HX-Request", "true")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    routes::app(state.clone()).oneshot(req).await.unwrap()
}

#[tokio::test]
async fn rows_list_seeded_instruments() {
    let state = test_state();
    let (_session, cookie) = signed_in(&state).await;

    let res = get(&state, "/watchlist/rows", &cookie).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_body_string(res).await;
    for sym in ["CARL-A", "CARL-B", "HEINA", "BUD", "^IXIC"] {
        assert!(body.contains(&format!("<strong>{sym}</strong>")), "missing {sym}");
    }
    assert!(body.contains("5 instruments tracked"));
    assert!(body.contains("895.50"));
    assert!(body.contains("234,567"));
}

#[tokio::test]
async fn sector_filter_narrows_rows() {
    let state = test_state();
    let (_session, cookie) = signed_in(&state).await;

    let body = response_body_string(get(&state, "/watchlist/rows?sector=Index", &cookie).await).await;
    assert!(body.contains("NASDAQ Composite"));
    assert!(!body.contains("Heineken"));

    let body = response_body_string(get(&state, "/watchlist/rows?sector=Technology", &cookie).await).await;
    assert!(body.contains("No instruments in Technology."));
}

#[tokio::test]
async fn add_symbol_appends_and_triggers_refresh() {
    let state = test_state();
    let (session, cookie) = signed_in(&state).await;

    let res = post_form(&state, "/watchlist", &cookie, "symbol=nvda&sector=All").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("HX-Trigger").unwrap(), "watchlistUpdated");

    let body = response_body_string(res).await;
    assert!(body.contains("<strong>NVDA</strong>"));
    assert!(body.contains("NVDA Corp."));

    let wl = session.watchlist.read().await;
    assert_eq!(wl.len(), 6);
    let added = wl.get("NVDA").unwrap();
    assert!(!added.is_favorite);
    assert!(added.price >= 50.0 && added.price < 550.0);
}

#[tokio::test]
async fn duplicate_or_empty_symbol_is_rejected() {
    let state = test_state();
    let (session, cookie) = signed_in(&state).await;

    let res = post_form(&state, "/watchlist", &cookie, "symbol=heina").await;
    assert!(res.headers().get("HX-Trigger").is_none());
    let body = response_body_string(res).await;
    assert!(body.contains("HEINA is already on the watchlist."));

    let body = response_body_string(post_form(&state, "/watchlist", &cookie, "symbol=++").await).await;
    assert!(body.contains("Enter a symbol to add."));

    assert_eq!(session.watchlist.read().await.len(), 5);
}

#[tokio::test]
async fn favorite_toggles_flag() {
    let state = test_state();
    let (session, cookie) = signed_in(&state).await;

    let res = post_form(&state, "/watchlist/HEINA/favorite", &cookie, "sector=All").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(session.watchlist.read().await.get("HEINA").unwrap().is_favorite);

    post_form(&state, "/watchlist/HEINA/favorite", &cookie, "").await;
    assert!(!session.watchlist.read().await.get("HEINA").unwrap().is_favorite);
}

#[tokio::test]
async fn delete_removes_row_and_keeps_filter() {
    let state = test_state();
    let (session, cookie) = signed_in(&state).await;

    let res = post_form(&state, "/watchlist/BUD/delete", &cookie, "sector=Beverages").await;
    assert_eq!(res.headers().get("HX-Trigger").unwrap(), "watchlistUpdated");

    let body = response_body_string(res).await;
    assert!(!body.contains("<strong>BUD</strong>"));
    assert!(!body.contains("NASDAQ Composite"));
    assert!(body.contains("4 instruments tracked"));
    assert!(session.watchlist.read().await.get("BUD").is_none());

    // unknown symbol is a no-op
    let res = post_form(&state, "/watchlist/BUD/delete", &cookie, "").await;
    assert!(res.headers().get("HX-Trigger").is_none());
}

#[tokio::test]
async fn search_suggests_matching_symbols() {
    let state = test_state();
    let (_session, cookie) = signed_in(&state).await;

    let body = response_body_string(get(&state, "/watchlist/search?q=nv", &cookie).await).await;
    assert!(body.contains("NVDA"));
    assert!(!body.contains("AAPL"));

    let body = response_body_string(get(&state, "/watchlist/search?q=", &cookie).await).await;
    assert!(!body.contains("NVDA"));
}
