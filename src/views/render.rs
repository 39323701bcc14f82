use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

use crate::{
    models::{Module, TopTicker},
    services::session_service::Session,
    AppState,
};

pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn hx_trigger_value(events: &[&str]) -> HeaderValue {
    if events.len() == 1 {
        return HeaderValue::from_str(events[0]).unwrap_or_else(|_| HeaderValue::from_static(""));
    }

    let mut map = serde_json::Map::new();
    for &e in events {
        map.insert(e.to_string(), serde_json::Value::Bool(true));
    }

    let json = serde_json::Value::Object(map).to_string();
    HeaderValue::from_str(&json).unwrap_or_else(|_| HeaderValue::from_static(""))
}

pub fn htmx_redirect(path: &str) -> Response {
    let mut headers = HeaderMap::new();
    if let Ok(v) = HeaderValue::from_str(path) {
        headers.insert("HX-Redirect", v);
    }
    (StatusCode::OK, headers, Html(String::new())).into_response()
}

pub fn fmt2(x: f64) -> String {
    format!("{:.2}", x)
}

/// Two decimals with an explicit sign, as in "+1.25".
pub fn fmt_signed2(x: f64) -> String {
    if x >= 0.0 {
        format!("+{:.2}", x)
    } else {
        format!("{:.2}", x)
    }
}

pub fn fmt_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Two decimals with thousands separators, as in "15,224.11".
pub fn fmt2_grouped(x: f64) -> String {
    let s = fmt2(x.abs());
    let (int, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let grouped = int
        .parse::<u64>()
        .map(fmt_thousands)
        .unwrap_or_else(|_| int.to_string());
    let sign = if x < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

/// Market-cap style: "1.23T", "456.70B", "12.00M".
pub fn fmt_compact(n: u64) -> String {
    let x = n as f64;
    if x >= 1e12 {
        format!("{:.2}T", x / 1e12)
    } else if x >= 1e9 {
        format!("{:.2}B", x / 1e9)
    } else if x >= 1e6 {
        format!("{:.2}M", x / 1e6)
    } else {
        fmt_thousands(n)
    }
}

/// "up" / "down" class for a signed number.
pub fn trend(x: f64) -> &'static str {
    if x >= 0.0 { "up" } else { "down" }
}

pub fn render_page(state: &AppState, tpl: &str, ctx: &serde_json::Value) -> Result<String, String> {
    state.hbs.render(tpl, ctx).map_err(|e| format!("template error: {e}"))
}

/// Renders a template, or its error inline, for htmx swaps.
pub fn fragment(state: &AppState, tpl: &str, ctx: &serde_json::Value) -> Response {
    match render_page(state, tpl, ctx) {
        Ok(html) => (StatusCode::OK, Html(html)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}

pub fn ticker_ctx(t: &TopTicker) -> serde_json::Value {
    json!({
        "share_price": fmt2(t.share_price),
        "share_change": fmt2(t.share_change.abs()),
        "share_arrow": if t.share_change >= 0.0 { "▲" } else { "▼" },
        "share_trend": trend(t.share_change),
        "index_level": fmt2_grouped(t.index_level),
        "last_sync": t.last_sync_secs,
    })
}

pub async fn sidebar_ctx(session: &Session) -> serde_json::Value {
    let active = session.shell.read().await.active_module;
    let alert_count = session.alerts.read().await.len();

    // the dashboard entry doubles as the charts entry
    let highlighted = match active {
        Module::Charts => Module::Dashboard,
        m => m,
    };

    let items: Vec<serde_json::Value> = Module::SIDEBAR
        .iter()
        .map(|m| {
            json!({
                "id": m.id(),
                "title": m.title(),
                "active": *m == highlighted,
                "badge": if *m == Module::Alerts && alert_count > 0 {
                    Some(alert_count)
                } else {
                    None
                },
            })
        })
        .collect();

    json!({ "items": items })
}

pub async fn countdown_ctx(session: &Session) -> serde_json::Value {
    let shell = session.shell.read().await;
    json!({
        "countdown": shell.clock.badge(),
        "warning": shell.clock.remaining() <= 60,
    })
}

/// Wraps a module body in the dashboard shell.
pub async fn render_full(
    state: &AppState,
    session: &Session,
    title: &str,
    body_html: String,
    show_disclaimer: bool,
) -> Result<String, String> {
    let theme = session.shell.read().await.theme;
    let ticker = ticker_ctx(&*session.top_ticker.read().await);

    let ctx = json!({
        "title": title,
        "body": body_html,
        "is_logged_in": true,
        "theme": theme.as_str(),
        "ticker": ticker,
        "countdown": countdown_ctx(session).await,
        "sidebar": sidebar_ctx(session).await,
        "show_disclaimer": show_disclaimer,
    });

    render_page(state, "layouts/base", &ctx)
}

/// Login and error pages: the layout without the shell.
pub fn render_bare(state: &AppState, title: &str, body_html: String) -> Result<String, String> {
    let ctx = json!({
        "title": title,
        "body": body_html,
        "is_logged_in": false,
        "theme": "light",
    });

    render_page(state, "layouts/base", &ctx)
}

/// Fragment for htmx, full shell page otherwise.
pub async fn respond(
    state: &AppState,
    headers: &HeaderMap,
    session: &Session,
    title: &str,
    body: Result<String, String>,
    show_disclaimer: bool,
) -> Response {
    let body = match body {
        Ok(b) => b,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    };

    if is_htmx(headers) {
        return (StatusCode::OK, Html(body)).into_response();
    }

    match render_full(state, session, title, body, show_disclaimer).await {
        Ok(page) => (StatusCode::OK, Html(page)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}
