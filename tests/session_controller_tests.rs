use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use http_body_util::BodyExt;
use investordesk::{
    config,
    models::{Module, Theme},
    routes,
    services::{
        auth_service::{self, DISCLAIMER_COOKIE},
        session_service::Session,
    },
    AppState,
};
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

async fn send(state: &AppState, req: Request<Body>) -> Response {
    routes::app(state.clone()).oneshot(req).await.unwrap()
}

fn get(uri: &str, cookie: &str, htmx: bool) -> Request<Body> {
    let mut req = Request::builder().uri(uri).header(header::COOKIE, cookie);
    if htmx {
        req = req.header("HX-Request", "true");
    }
    req.body(Body::empty()).unwrap()
}

fn post(uri: &str, cookie: &str, htmx: bool) -> Request<Body> {
    let mut req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if htmx {
        req = req.header("HX-Request", "true");
    }
    req.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn home_renders_shell_with_dashboard_and_disclaimer() {
    let state = test_state();
    let (_session, cookie) = signed_in(&state).await;

    let res = send(&state, get("/", &cookie, false)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_body_string(res).await;
    assert!(body.contains("Session: 15:00"));
    assert!(body.contains("DKK 195.35"));
    assert!(body.contains("15,224.11"));
    assert!(body.contains("Data Confidentiality Notice"));
    assert!(body.contains("74.1B"));
    assert!(body.contains("data-events=\"/events\""));
}

#[tokio::test]
async fn accepted_disclaimer_is_not_shown_again() {
    let state = test_state();
    let (_session, cookie) = signed_in(&state).await;

    let res = send(&state, post("/disclaimer/accept", &cookie, true)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let set = res
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .find(|c| c.starts_with(DISCLAIMER_COOKIE))
        .expect("disclaimer cookie");
    assert!(set.starts_with(&format!("{DISCLAIMER_COOKIE}=true")));
    assert!(set.contains("Max-Age"));

    let both = format!("{cookie}; {DISCLAIMER_COOKIE}=true");
    let body = response_body_string(send(&state, get("/", &both, false)).await).await;
    assert!(!body.contains("Data Confidentiality Notice"));
}

#[tokio::test]
async fn declining_disclaimer_ends_session() {
    let state = test_state();
    let (session, cookie) = signed_in(&state).await;
    let mut events = session.subscribe();

    let res = send(&state, post("/disclaimer/decline", &cookie, true)).await;
    assert_eq!(res.headers().get("HX-Redirect").unwrap(), "/login");

    assert!(state.sessions.get(&session.id).await.is_none());
    assert!(!session.is_authenticated().await);
    assert_eq!(events.recv().await.unwrap(), "sessionExpired");
}

#[tokio::test]
async fn module_switch_returns_fragment_and_remembers_module() {
    let state = test_state();
    let (session, cookie) = signed_in(&state).await;

    let res = send(&state, get("/modules/watchlist", &cookie, true)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("HX-Trigger").unwrap(), "moduleChanged");

    let body = response_body_string(res).await;
    assert!(body.contains("watchlist-rows"));
    assert!(!body.contains("<html"));
    assert_eq!(session.shell.read().await.active_module, Module::Watchlist);

    // the shell reopens on the last module
    let body = response_body_string(send(&state, get("/", &cookie, false)).await).await;
    assert!(body.contains("watchlist-rows"));
}

#[tokio::test]
async fn unknown_module_falls_back_to_dashboard() {
    let state = test_state();
    let (session, cookie) = signed_in(&state).await;

    let res = send(&state, get("/modules/bogus", &cookie, true)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_body_string(res).await;
    assert!(body.contains("CARLSBERG MARKET ANALYSIS"));
    assert_eq!(session.shell.read().await.active_module, Module::Dashboard);
}

#[tokio::test]
async fn theme_toggle_flips_and_refreshes() {
    let state = test_state();
    let (session, cookie) = signed_in(&state).await;

    let res = send(&state, post("/theme", &cookie, true)).await;
    assert_eq!(res.headers().get("HX-Refresh").unwrap(), "true");
    assert_eq!(session.shell.read().await.theme, Theme::Dark);

    let res = send(&state, post("/theme", &cookie, false)).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(session.shell.read().await.theme, Theme::Light);
}

#[tokio::test]
async fn countdown_fragment_reflects_clock() {
    let state = test_state();
    let (session, cookie) = signed_in(&state).await;

    for _ in 0..850 {
        session.shell.write().await.clock.tick();
    }

    let body = response_body_string(send(&state, get("/session/countdown", &cookie, true)).await).await;
    assert!(body.contains("Session: 0:50"));
    assert!(body.contains("countdown-warning"));
}

#[tokio::test]
async fn ticker_fragment_shows_share_price() {
    let state = test_state();
    let (_session, cookie) = signed_in(&state).await;

    let body = response_body_string(send(&state, get("/ticker", &cookie, true)).await).await;
    assert!(body.contains("DKK 195.35"));
    assert!(body.contains("▼1.21%"));
    assert!(body.contains("Last synced: 0s ago"));
}

#[tokio::test]
async fn sidebar_badge_counts_alerts() {
    let state = test_state();
    let (session, cookie) = signed_in(&state).await;

    let body = response_body_string(send(&state, get("/sidebar", &cookie, true)).await).await;
    assert!(body.contains("<span class=\"badge\">2</span>"));

    session.alerts.write().await.delete("1");
    let body = response_body_string(send(&state, get("/sidebar", &cookie, true)).await).await;
    assert!(body.contains("<span class=\"badge\">1</span>"));
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let state = test_state();
    let (_session, cookie) = signed_in(&state).await;

    let res = send(&state, get("/nowhere", &cookie, false)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn public_event_stream_forwards_broadcasts() {
    let state = test_state();

    let req = Request::builder().uri("/events/public").body(Body::empty()).unwrap();
    let res = send(&state, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );

    let mut body = res.into_body();
    state.events_tx.send("loginTickerUpdated".to_string()).unwrap();

    let frame = body.frame().await.unwrap().unwrap();
    let text = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
    assert!(text.contains("event: loginTickerUpdated"));
}

#[tokio::test]
async fn session_event_stream_forwards_notifications() {
    let state = test_state();
    let (session, cookie) = signed_in(&state).await;

    let res = send(&state, get("/events", &cookie, false)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let mut body = res.into_body();
    session.notify("watchlistUpdated");

    let frame = body.frame().await.unwrap().unwrap();
    let text = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
    assert!(text.contains("event: watchlistUpdated"));
}
