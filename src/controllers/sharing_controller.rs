use axum::{
    extract::{Extension, Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::CurrentSession,
    controllers::home_controller,
    models::Module,
    render,
    services::{
        session_service::Session,
        sharing_service::{self, ShareTarget, ShareType, SharingSettings},
    },
    AppState,
};

/// Link for whatever the session's chart is showing right now.
async fn current_link(state: &AppState, session: &Session) -> (String, String) {
    let chart = session.chart.read().await;
    let link = sharing_service::chart_link(&state.settings.share_base_url, chart.symbol(), &chart.interval);
    let embed = sharing_service::embed_code(&state.settings.share_base_url, chart.symbol());
    (link, embed)
}

async fn panel_html(state: &AppState, session: &Session) -> Result<String, String> {
    let (link, embed) = current_link(state, session).await;
    let settings = session.sharing.read().await.clone();

    let targets: Vec<serde_json::Value> = ShareTarget::ALL
        .iter()
        .map(|t| json!({ "id": t.id(), "label": t.label() }))
        .collect();

    let ctx = json!({
        "link": link,
        "embed": embed,
        "targets": targets,
        "share_text": settings.share_text,
        "image": settings.share_type == ShareType::Image,
        "live": settings.share_type == ShareType::Live,
        "include_watermark": settings.include_watermark,
    });

    render::render_page(state, "partials/sharing_panel", &ctx)
}

pub async fn module_body(state: &AppState, session: &Session) -> Result<String, String> {
    let panel = panel_html(state, session).await?;
    render::render_page(state, "modules/sharing", &json!({ "panel_html": panel }))
}

// GET /sharing
pub async fn get_sharing(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    home_controller::show_module(&state, &headers, &jar, &session, Module::Sharing).await
}

#[derive(Deserialize)]
pub struct SharingSettingsForm {
    pub share_type: Option<String>,
    pub share_text: Option<String>,
    pub include_watermark: Option<String>,
}

pub fn apply_settings(settings: &mut SharingSettings, form: &SharingSettingsForm) {
    if let Some(t) = form.share_type.as_deref().and_then(ShareType::parse) {
        settings.share_type = t;
    }
    if let Some(text) = &form.share_text {
        settings.share_text = text.clone();
    }
    settings.include_watermark = form.include_watermark.is_some();
}

// POST /sharing/settings
pub async fn post_sharing_settings(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Form(form): Form<SharingSettingsForm>,
) -> Response {
    apply_settings(&mut *session.sharing.write().await, &form);

    match panel_html(&state, &session).await {
        Ok(html) => (StatusCode::OK, Html(html)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}

// GET /share/:platform
pub async fn get_share(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    let Some(target) = ShareTarget::parse(&platform) else {
        return (StatusCode::NOT_FOUND, Html("unknown platform".to_string())).into_response();
    };

    let (link, _) = current_link(&state, &session).await;
    let text = session.sharing.read().await.share_text.clone();

    Redirect::to(&sharing_service::share_url(target, &link, &text)).into_response()
}
