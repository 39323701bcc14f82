use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use http_body_util::BodyExt;
use investordesk::{
    config, routes,
    services::auth_service::{self, LISTING_COOKIE},
    AppState,
};
use tower::ServiceExt;

fn test_state() -> AppState {
    let mut settings = config::load();
    settings.login_delay_ms = 0;
    AppState::new(settings).expect("templates")
}

async fn response_body_string(res: Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

fn set_cookies(res: &Response) -> Vec<String> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// `name=value` pair of the auth cookie set by `res`.
fn auth_cookie_pair(state: &AppState, res: &Response) -> String {
    let prefix = format!("{}=", state.settings.jwt_cookie_name);
    let raw = set_cookies(res)
        .into_iter()
        .find(|c| c.starts_with(&prefix))
        .expect("auth cookie");
    raw.split(';').next().unwrap().to_string()
}

async fn post_login(state: &AppState, htmx: bool) -> Response {
    let mut req = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if htmx {
        req = req.header("HX-Request", "true");
    }

    routes::app(state.clone())
        .oneshot(req.body(Body::from("username=anyone&password=x")).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn anonymous_page_request_redirects_to_login() {
    let state = test_state();

    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let res = routes::app(state).oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn anonymous_htmx_request_gets_hx_redirect() {
    let state = test_state();

    let req = Request::builder()
        .uri("/watchlist/rows")
        .header("HX-Request", "true")
        .body(Body::empty())
        .unwrap();
    let res = routes::app(state).oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("HX-Redirect").unwrap(), "/login");
}

#[tokio::test]
async fn anonymous_websocket_upgrade_is_unauthorized() {
    let state = test_state();

    let req = Request::builder()
        .uri("/ws/chart")
        .header(header::UPGRADE, "websocket")
        .header(header::CONNECTION, "upgrade")
        .body(Body::empty())
        .unwrap();
    let res = routes::app(state).oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forged_token_is_treated_as_anonymous() {
    let state = test_state();

    let req = Request::builder()
        .uri("/")
        .header(header::COOKIE, format!("{}=not-a-jwt", state.settings.jwt_cookie_name))
        .body(Body::empty())
        .unwrap();
    let res = routes::app(state).oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn login_page_renders_share_price_card() {
    let state = test_state();

    let req = Request::builder().uri("/login").body(Body::empty()).unwrap();
    let res = routes::app(state).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_body_string(res).await;
    assert!(body.contains("login-ticker"));
    assert!(body.contains("CARL-A.CPH"));
    assert!(body.contains("1196.50 DKK"));
    assert!(body.contains("/events/public"));
}

#[tokio::test]
async fn login_creates_session_and_sets_cookie() {
    let state = test_state();

    let res = post_login(&state, false).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/");

    let cookie = auth_cookie_pair(&state, &res);
    assert_eq!(state.sessions.len().await, 1);

    let session_id = auth_service::decode_session_token(
        &state.settings,
        cookie.split_once('=').unwrap().1,
    )
    .unwrap();
    let session = state.sessions.get(&session_id).await.expect("session stored");
    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn htmx_login_answers_with_hx_redirect() {
    let state = test_state();

    let res = post_login(&state, true).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("HX-Redirect").unwrap(), "/");
    assert!(!set_cookies(&res).is_empty());
}

#[tokio::test(start_paused = true)]
async fn login_waits_for_configured_delay() {
    let mut settings = config::load();
    settings.login_delay_ms = 2500;
    let state = AppState::new(settings).expect("templates");

    let started = tokio::time::Instant::now();
    let res = post_login(&state, false).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(started.elapsed() >= std::time::Duration::from_millis(2500));
}

#[tokio::test]
async fn login_page_redirects_home_when_signed_in() {
    let state = test_state();
    let cookie = auth_cookie_pair(&state, &post_login(&state, false).await);

    let req = Request::builder()
        .uri("/login")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let res = routes::app(state).oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn logout_removes_session_and_clears_cookie() {
    let state = test_state();
    let cookie = auth_cookie_pair(&state, &post_login(&state, false).await);

    let req = Request::builder()
        .uri("/logout")
        .header(header::COOKIE, cookie.clone())
        .body(Body::empty())
        .unwrap();
    let res = routes::app(state.clone()).oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/login");
    assert!(state.sessions.is_empty().await);

    let prefix = format!("{}=", state.settings.jwt_cookie_name);
    let cleared = set_cookies(&res)
        .into_iter()
        .find(|c| c.starts_with(&prefix))
        .expect("cleared cookie");
    assert!(cleared.contains("Max-Age=0"));

    // the old token no longer resolves to a session
    let req = Request::builder()
        .uri("/")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let res = routes::app(state).oneshot(req).await.unwrap();
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/login");
}

async fn select_listing(state: &AppState, cookie: Option<&str>, symbol: &str) -> Response {
    let mut req = Request::builder()
        .method("POST")
        .uri("/login/ticker")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        req = req.header(header::COOKIE, c);
    }

    routes::app(state.clone())
        .oneshot(req.body(Body::from(format!("symbol={symbol}"))).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn login_ticker_selection_is_per_visitor() {
    let state = test_state();

    // first visitor picks the US OTC listing
    let res = select_listing(&state, None, "CABGY").await;
    assert_eq!(res.status(), StatusCode::OK);
    let listing = set_cookies(&res)
        .into_iter()
        .find(|c| c.starts_with(&format!("{LISTING_COOKIE}=")))
        .expect("listing cookie");
    let listing = listing.split(';').next().unwrap().to_string();
    assert_eq!(listing, format!("{LISTING_COOKIE}=CABGY"));

    let body = response_body_string(res).await;
    assert!(body.contains("17.82 USD"));
    assert!(body.contains("value=\"CABGY\" selected"));

    // a second visitor without the cookie still sees the default listing
    let req = Request::builder().uri("/login").body(Body::empty()).unwrap();
    let body = response_body_string(routes::app(state.clone()).oneshot(req).await.unwrap()).await;
    assert!(body.contains("1196.50 DKK"));
    assert!(body.contains("value=\"CARL-A.CPH\" selected"));
    assert!(!body.contains("value=\"CABGY\" selected"));

    // the first visitor's refreshes keep their choice
    let req = Request::builder()
        .uri("/login/ticker")
        .header(header::COOKIE, listing)
        .body(Body::empty())
        .unwrap();
    let body = response_body_string(routes::app(state).oneshot(req).await.unwrap()).await;
    assert!(body.contains("17.82 USD"));
}

#[tokio::test]
async fn unknown_listing_keeps_previous_selection() {
    let state = test_state();
    let cookie = format!("{LISTING_COOKIE}=CARLS.L");

    let res = select_listing(&state, Some(&cookie), "NOPE").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(set_cookies(&res).is_empty());

    let body = response_body_string(res).await;
    assert!(body.contains("14.23 GBP"));
}

#[tokio::test]
async fn health_is_public() {
    let state = test_state();

    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let res = routes::app(state).oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(response_body_string(res).await, "ok");
}
