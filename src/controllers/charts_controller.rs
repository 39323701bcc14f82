use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Extension, State,
    },
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Local;
use futures_util::{Sink, SinkExt, StreamExt};
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval, Duration};

use crate::{
    auth::CurrentSession,
    controllers::home_controller,
    models::{ChartLayout, ChartType, Module},
    render::{self, fmt2, fmt_signed2, trend},
    services::{
        chart_service::{self, ChartState, INTERVALS, KPI_CARDS, SHAREGRAPH_URL, SYMBOLS},
        session_service::Session,
    },
    AppState,
};

pub fn chart_snapshot(chart: &ChartState) -> serde_json::Value {
    json!({
        "symbol": chart.symbol(),
        "name": chart_service::symbol_name(chart.symbol()).unwrap_or_default(),
        "interval": chart.interval,
        "chartType": chart.chart_type.as_str(),
        "realTime": chart.real_time,
        "layout": chart.layout.as_str(),
        "points": chart.series.points(),
    })
}

fn panel_ctx(chart: &ChartState) -> serde_json::Value {
    let points = chart.series.points();
    let (last, first) = match (points.last(), points.first()) {
        (Some(l), Some(f)) => (l.close, f.open),
        _ => (0.0, 0.0),
    };
    let change = last - first;
    let high = points.iter().map(|p| p.high).fold(f64::MIN, f64::max);
    let low = points.iter().map(|p| p.low).fold(f64::MAX, f64::min);

    json!({
        "symbol": chart.symbol(),
        "name": chart_service::symbol_name(chart.symbol()).unwrap_or_default(),
        "price": fmt2(last),
        "change": fmt_signed2(change),
        "trend": trend(change),
        "high": if points.is_empty() { "-".to_string() } else { fmt2(high) },
        "low": if points.is_empty() { "-".to_string() } else { fmt2(low) },
        "points": points.len(),
        "real_time": chart.real_time,
        "last_update": chart.last_update.format("%-I:%M:%S %p").to_string(),
    })
}

pub async fn module_body(state: &AppState, session: &Session) -> Result<String, String> {
    let chart = session.chart.read().await;

    let panel_html = render::render_page(state, "partials/chart_panel", &panel_ctx(&chart))?;

    let symbols: Vec<serde_json::Value> = SYMBOLS
        .iter()
        .map(|(s, name)| json!({ "symbol": s, "name": name, "selected": *s == chart.symbol() }))
        .collect();
    let intervals: Vec<serde_json::Value> = INTERVALS
        .iter()
        .map(|iv| json!({ "value": iv, "selected": *iv == chart.interval }))
        .collect();

    let ctx = json!({
        "kpis": KPI_CARDS,
        "symbols": symbols,
        "intervals": intervals,
        "candlestick": chart.chart_type == ChartType::Candlestick,
        "real_time": chart.real_time,
        "auto_save": chart.auto_save,
        "grid": chart.layout == ChartLayout::Grid,
        "panel_html": panel_html,
        "sharegraph_url": SHAREGRAPH_URL,
    });

    render::render_page(state, "modules/charts", &ctx)
}

// GET /charts
pub async fn get_charts(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    home_controller::show_module(&state, &headers, &jar, &session, Module::Charts).await
}

// GET /charts/panel
pub async fn get_chart_panel(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    let ctx = panel_ctx(&*session.chart.read().await);
    render::fragment(&state, "partials/chart_panel", &ctx)
}

// GET /charts/data
pub async fn get_chart_data(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Json<serde_json::Value> {
    Json(chart_snapshot(&*session.chart.read().await))
}

/// Checkbox fields are present only when ticked.
#[derive(Deserialize, Default)]
pub struct ChartSettingsForm {
    pub symbol: Option<String>,
    pub interval: Option<String>,
    pub chart_type: Option<String>,
    pub layout: Option<String>,
    pub real_time: Option<String>,
    pub auto_save: Option<String>,
}

fn checked(v: &Option<String>) -> bool {
    matches!(v.as_deref().map(str::trim), Some("on" | "true" | "1"))
}

/// Applies the control bar. Returns whether the series itself changed.
pub fn apply_settings(chart: &mut ChartState, form: &ChartSettingsForm) -> bool {
    let mut reseeded = false;

    if let Some(sym) = &form.symbol {
        let mut rng = StdRng::from_entropy();
        reseeded = chart.set_symbol(sym, &mut rng, Local::now());
    }
    if let Some(iv) = &form.interval {
        chart.set_interval(iv);
    }
    if let Some(t) = form.chart_type.as_deref().and_then(ChartType::parse) {
        chart.chart_type = t;
    }
    if let Some(l) = form.layout.as_deref().and_then(ChartLayout::parse) {
        chart.layout = l;
    }
    chart.real_time = checked(&form.real_time);
    chart.auto_save = checked(&form.auto_save);

    reseeded
}

// POST /charts/settings
pub async fn post_chart_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Form(form): Form<ChartSettingsForm>,
) -> Response {
    let reseeded = apply_settings(&mut *session.chart.write().await, &form);
    session.notify("chartUpdated");

    if reseeded {
        tracing::debug!(session = session.short_id(), "chart reseeded");
    }

    let mut res = home_controller::show_module(&state, &headers, &jar, &session, Module::Charts).await;
    res.headers_mut()
        .insert("HX-Trigger", render::hx_trigger_value(&["chartUpdated"]));
    res
}

// GET /ws/chart
pub async fn ws_chart(
    ws: WebSocketUpgrade,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_chart_socket(socket, session))
}

async fn send_snapshot<S>(sink: &mut S, session: &Session) -> bool
where
    S: Sink<Message> + Unpin,
{
    let snap = chart_snapshot(&*session.chart.read().await).to_string();
    sink.send(Message::Text(snap)).await.is_ok()
}

/// After missed events, resend the full window unless the session was signed out meanwhile.
async fn resync_after_lag<S>(sink: &mut S, session: &Session) -> bool
where
    S: Sink<Message> + Unpin,
{
    if !session.is_authenticated().await {
        return false;
    }
    send_snapshot(sink, session).await
}

async fn handle_chart_socket(socket: WebSocket, session: Arc<Session>) {
    tracing::info!(session = session.short_id(), "chart WS connected");

    let mut events = session.subscribe();
    let (mut sink, mut stream) = socket.split();
    let mut ping = interval(Duration::from_secs(25));

    if !send_snapshot(&mut sink, &session).await {
        return;
    }

    loop {
        tokio::select! {
            _ = ping.tick() => {
                if sink.send(Message::Ping(b"ping".to_vec())).await.is_err() {
                    break;
                }
            }

            evt = events.recv() => {
                match evt {
                    Ok(name) if name == "chartUpdated" => {
                        if !send_snapshot(&mut sink, &session).await {
                            break;
                        }
                    }
                    Ok(name) if name == "sessionExpired" => break,
                    Ok(_) => {}
                    Err(RecvError::Lagged(_)) => {
                        if !resync_after_lag(&mut sink, &session).await {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            client_msg = stream.next() => {
                match client_msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
        }
    }

    let _ = sink.send(Message::Close(None)).await;
    tracing::info!(session = session.short_id(), "chart WS disconnected");
}
