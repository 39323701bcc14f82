use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use http_body_util::BodyExt;
use investordesk::{
    config, routes,
    services::{auth_service, session_service::Session, sharing_service::ShareType},
    AppState,
};
use tower::ServiceExt;

fn test_state() -> AppState {
    let mut settings = config::load();
    settings.login_delay_ms = 0;
    settings.share_base_url = "https://sg3.trading".to_string();
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

#[tokio::test]
async fn sharing_module_shows_link_and_embed_for_current_chart() {
    let state = test_state();
    let (_session, cookie) = signed_in(&state).await;

    let res = get(&state, "/sharing", &cookie).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_body_string(res).await;
    assert!(body.contains("https://sg3.trading/chart/CARL-A/5m/analysis"));
    assert!(body.contains("https://sg3.trading/embed/chart/CARL-A"));
    // embed markup is shown as text, not rendered
    assert!(body.contains("&lt;iframe"));
    assert!(body.contains("/share/twitter"));
}

#[tokio::test]
async fn share_redirects_to_platform_with_encoded_link() {
    let state = test_state();
    let (_session, cookie) = signed_in(&state).await;

    let res = get(&state, "/share/twitter", &cookie).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let location = res.headers().get(header::LOCATION).unwrap().to_str().unwrap();
    assert_eq!(
        location,
        "https://twitter.com/intent/tweet?text=Check%20out%20this%20amazing%20chart%20analysis%20on%20SG3!\
         &url=https%3A%2F%2Fsg3.trading%2Fchart%2FCARL-A%2F5m%2Fanalysis"
    );

    let res = get(&state, "/share/linkedin", &cookie).await;
    let location = res.headers().get(header::LOCATION).unwrap().to_str().unwrap();
    assert!(location.starts_with("https://www.linkedin.com/sharing/share-offsite/?url=https%3A%2F%2F"));
}

#[tokio::test]
async fn share_link_follows_chart_symbol() {
    let state = test_state();
    let (session, cookie) = signed_in(&state).await;

    {
        let mut chart = session.chart.write().await;
        let mut rng = rand::thread_rng();
        chart.set_symbol("MSFT", &mut rng, chrono::Local::now());
        chart.set_interval("1h");
    }

    let res = get(&state, "/share/facebook", &cookie).await;
    let location = res.headers().get(header::LOCATION).unwrap().to_str().unwrap();
    assert_eq!(
        location,
        "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fsg3.trading%2Fchart%2FMSFT%2F1h%2Fanalysis"
    );
}

#[tokio::test]
async fn unknown_platform_is_not_found() {
    let state = test_state();
    let (_session, cookie) = signed_in(&state).await;

    let res = get(&state, "/share/myspace", &cookie).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn advanced_share_settings_are_saved() {
    let state = test_state();
    let (session, cookie) = signed_in(&state).await;

    let req = Request::builder()
        .method("POST")
        .uri("/sharing/settings")
        .header(header::COOKIE, cookie)
        .header("HX-Request", "true")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("share_type=live&share_text=Have+a+look"))
        .unwrap();
    let res = routes::app(state.clone()).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_body_string(res).await;
    assert!(body.contains("Have a look"));

    let settings = session.sharing.read().await;
    assert_eq!(settings.share_type, ShareType::Live);
    assert_eq!(settings.share_text, "Have a look");
    assert!(!settings.include_watermark);
}
