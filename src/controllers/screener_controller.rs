use axum::{
    extract::{Extension, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::CurrentSession,
    controllers::home_controller,
    models::{Module, ScreenerFilters, ScreenerResult, SortField, SortOrder},
    render::{self, fmt2, fmt_compact, fmt_signed2, fmt_thousands, trend},
    services::{screener_service, session_service::Session},
    AppState,
};

/// Query-string filters. Every field is parse-or-default.
#[derive(Debug, Deserialize, Default)]
pub struct ScreenerQuery {
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_volume: Option<String>,
    pub max_volume: Option<String>,
    pub min_rsi: Option<String>,
    pub max_rsi: Option<String>,
    pub min_pe: Option<String>,
    pub max_pe: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

fn num_or(raw: &Option<String>, default: f64) -> f64 {
    raw.as_deref()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

impl ScreenerQuery {
    pub fn filters(&self) -> ScreenerFilters {
        let d = ScreenerFilters::default();
        ScreenerFilters {
            min_price: num_or(&self.min_price, d.min_price),
            max_price: num_or(&self.max_price, d.max_price),
            min_volume: num_or(&self.min_volume, d.min_volume),
            max_volume: num_or(&self.max_volume, d.max_volume),
            min_rsi: num_or(&self.min_rsi, d.min_rsi),
            max_rsi: num_or(&self.max_rsi, d.max_rsi),
            min_pe: num_or(&self.min_pe, d.min_pe),
            max_pe: num_or(&self.max_pe, d.max_pe),
        }
    }

    pub fn sort(&self) -> (SortField, SortOrder) {
        let field = self.sort.as_deref().and_then(SortField::parse).unwrap_or_default();
        let order = self.order.as_deref().and_then(SortOrder::parse).unwrap_or_default();
        (field, order)
    }
}

fn row_ctx(r: &ScreenerResult) -> serde_json::Value {
    json!({
        "symbol": r.symbol,
        "name": r.name,
        "price": fmt2(r.price),
        "change": fmt_signed2(r.change),
        "change_percent": fmt_signed2(r.change_percent),
        "trend": trend(r.change_percent),
        "volume": fmt_thousands(r.volume),
        "market_cap": fmt_compact(r.market_cap),
        "pe": format!("{:.1}", r.pe),
        "rsi": format!("{:.1}", r.rsi),
        "signal": r.signal.as_str(),
    })
}

fn filters_ctx(f: &ScreenerFilters) -> serde_json::Value {
    json!({
        "min_price": f.min_price,
        "max_price": f.max_price,
        "min_volume": f.min_volume,
        "max_volume": f.max_volume,
        "min_rsi": f.min_rsi,
        "max_rsi": f.max_rsi,
        "min_pe": f.min_pe,
        "max_pe": f.max_pe,
    })
}

async fn results_html(state: &AppState, session: &Session, q: &ScreenerQuery) -> Result<String, String> {
    let filters = q.filters();
    let (field, order) = q.sort();

    let matched = screener_service::screen(&*session.screener.read().await, &filters, field, order);
    let rows: Vec<serde_json::Value> = matched
        .iter()
        .take(screener_service::DISPLAY_LIMIT)
        .map(row_ctx)
        .collect();

    // clicking the active column flips direction, any other column starts descending
    let columns: Vec<serde_json::Value> = SortField::ALL
        .iter()
        .map(|f| {
            let active = *f == field;
            let next = if active { order.flipped() } else { SortOrder::Desc };
            json!({
                "key": f.key(),
                "label": f.label(),
                "active": active,
                "order": order.as_str(),
                "next_order": next.as_str(),
            })
        })
        .collect();

    let ctx = json!({
        "rows": rows,
        "has_rows": !rows.is_empty(),
        "shown": rows.len(),
        "matched": matched.len(),
        "columns": columns,
        "filters": filters_ctx(&filters),
    });

    render::render_page(state, "partials/screener_results", &ctx)
}

pub async fn module_body(state: &AppState, session: &Session, q: &ScreenerQuery) -> Result<String, String> {
    let results = results_html(state, session, q).await?;

    let ctx = json!({
        "filters": filters_ctx(&q.filters()),
        "results_html": results,
    });

    render::render_page(state, "modules/screener", &ctx)
}

// GET /screener
pub async fn get_screener(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Query(q): Query<ScreenerQuery>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    session.shell.write().await.active_module = Module::Screener;

    let body = module_body(&state, &session, &q).await;
    render::respond(
        &state,
        &headers,
        &session,
        Module::Screener.title(),
        body,
        home_controller::disclaimer_pending(&jar),
    )
    .await
}

// GET /screener/results?min_price=..&sort=volume&order=asc
pub async fn get_results(
    State(state): State<AppState>,
    Query(q): Query<ScreenerQuery>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    match results_html(&state, &session, &q).await {
        Ok(html) => (StatusCode::OK, Html(html)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}
