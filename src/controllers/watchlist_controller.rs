use axum::{
    extract::{Extension, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::CurrentSession,
    controllers::home_controller,
    models::{Module, Sector, WatchlistItem},
    render::{self, fmt2, fmt_signed2, fmt_thousands, trend},
    services::{session_service::Session, watchlist_service},
    AppState,
};

fn item_ctx(i: &WatchlistItem) -> serde_json::Value {
    json!({
        "symbol": i.symbol,
        "name": i.name,
        "sector": i.sector.label(),
        "badge_class": i.sector.badge_class(),
        "price": fmt2(i.price),
        "change": fmt_signed2(i.change),
        "change_percent": fmt_signed2(i.change_percent),
        "trend": trend(i.change),
        "volume": fmt_thousands(i.volume),
        "is_favorite": i.is_favorite,
    })
}

fn sector_label(sector: Option<Sector>) -> &'static str {
    sector.map_or("All", |s| s.label())
}

async fn rows_html(
    state: &AppState,
    session: &Session,
    sector: Option<Sector>,
    error: Option<String>,
) -> Result<String, String> {
    let wl = session.watchlist.read().await;
    let rows: Vec<serde_json::Value> = wl.filtered(sector).into_iter().map(item_ctx).collect();

    let ctx = json!({
        "rows": rows,
        "has_rows": !rows.is_empty(),
        "total": wl.len(),
        "sector": sector_label(sector),
        "error": error,
    });

    render::render_page(state, "partials/watchlist_rows", &ctx)
}

fn rows_response(html: Result<String, String>, changed: bool) -> Response {
    match html {
        Ok(h) => {
            let mut res = (StatusCode::OK, Html(h)).into_response();
            if changed {
                res.headers_mut()
                    .insert("HX-Trigger", render::hx_trigger_value(&["watchlistUpdated"]));
            }
            res
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}

pub async fn module_body(state: &AppState, session: &Session) -> Result<String, String> {
    let rows = rows_html(state, session, None, None).await?;

    let mut sectors = vec![json!({ "label": "All", "selected": true })];
    sectors.extend(
        Sector::ALL
            .iter()
            .map(|s| json!({ "label": s.label(), "selected": false })),
    );

    let ctx = json!({ "sectors": sectors, "rows_html": rows });
    render::render_page(state, "modules/watchlist", &ctx)
}

#[derive(Deserialize, Default)]
pub struct SectorQuery {
    pub sector: Option<String>,
}

impl SectorQuery {
    fn sector(&self) -> Option<Sector> {
        self.sector.as_deref().and_then(Sector::parse)
    }
}

// GET /watchlist
pub async fn get_watchlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    home_controller::show_module(&state, &headers, &jar, &session, Module::Watchlist).await
}

// GET /watchlist/rows?sector=Beverages
pub async fn get_rows(
    State(state): State<AppState>,
    Query(q): Query<SectorQuery>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    rows_response(rows_html(&state, &session, q.sector(), None).await, false)
}

/// The add box sends its own `symbol` field while typing.
#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(alias = "symbol")]
    pub q: Option<String>,
}

// GET /watchlist/search?q=nv
pub async fn get_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let q = query.q.unwrap_or_default().trim().to_string();
    let results = watchlist_service::search(&q);

    let ctx = json!({
        "q": q,
        "results": results,
        "has_results": !results.is_empty(),
        "searched": !q.is_empty(),
    });

    render::fragment(&state, "partials/watchlist_search", &ctx)
}

#[derive(Deserialize)]
pub struct AddSymbolForm {
    pub symbol: String,
    pub sector: Option<String>,
}

// POST /watchlist
pub async fn post_add(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Form(form): Form<AddSymbolForm>,
) -> Response {
    let sector = form.sector.as_deref().and_then(Sector::parse);

    let added = {
        let mut rng = StdRng::from_entropy();
        let mut wl = session.watchlist.write().await;
        wl.add(&form.symbol, &mut rng).map(|i| i.symbol.clone())
    };

    match added {
        Ok(sym) => {
            tracing::debug!(session = session.short_id(), symbol = %sym, "watchlist add");
            session.notify("watchlistUpdated");
            rows_response(rows_html(&state, &session, sector, None).await, true)
        }
        Err(e) => rows_response(rows_html(&state, &session, sector, Some(e)).await, false),
    }
}

// POST /watchlist/:symbol/favorite
pub async fn post_favorite(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Form(q): Form<SectorQuery>,
) -> Response {
    let changed = session.watchlist.write().await.toggle_favorite(&symbol).is_some();
    if changed {
        session.notify("watchlistUpdated");
    }
    rows_response(rows_html(&state, &session, q.sector(), None).await, changed)
}

// POST /watchlist/:symbol/delete
pub async fn post_delete(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Form(q): Form<SectorQuery>,
) -> Response {
    let changed = session.watchlist.write().await.remove(&symbol);
    if changed {
        session.notify("watchlistUpdated");
    }
    rows_response(rows_html(&state, &session, q.sector(), None).await, changed)
}
