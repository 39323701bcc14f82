use axum::{
    extract::{Extension, Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::CurrentSession,
    controllers::home_controller,
    models::{Alert, Module, Notifications},
    render::{self, fmt2},
    services::{
        alerts_service::{NewAlert, CONDITIONS, SYMBOLS},
        session_service::Session,
    },
    AppState,
};

fn fmt_ts(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn alert_ctx(a: &Alert) -> serde_json::Value {
    let status = a.status();
    let mut channels = Vec::new();
    if a.notifications.in_app {
        channels.push("In-app");
    }
    if a.notifications.web_push {
        channels.push("Web push");
    }
    if a.notifications.email {
        channels.push("Email");
    }
    if !a.notifications.webhook.is_empty() {
        channels.push("Webhook");
    }

    json!({
        "id": a.id,
        "name": a.name,
        "symbol": a.symbol,
        "condition": a.condition,
        "trigger_level": fmt2(a.trigger_level),
        "status": status.as_str(),
        "status_label": status.label(),
        "enabled": a.enabled,
        "last_triggered": a.last_triggered.map(fmt_ts),
        "channels": channels.join(", "),
    })
}

async fn list_html(state: &AppState, session: &Session, error: Option<String>) -> Result<String, String> {
    let book = session.alerts.read().await;
    let items: Vec<serde_json::Value> = book.list().iter().map(alert_ctx).collect();

    let ctx = json!({
        "error": error,
        "alerts": items,
        "has_alerts": !items.is_empty(),
        "count": items.len(),
    });

    render::render_page(state, "partials/alerts_list", &ctx)
}

/// List fragment, tagged so the sidebar badge refreshes.
async fn list_response(
    state: &AppState,
    session: &Session,
    changed: bool,
    error: Option<String>,
) -> Response {
    match list_html(state, session, error).await {
        Ok(html) => {
            let mut res = (StatusCode::OK, Html(html)).into_response();
            if changed {
                session.notify("alertsUpdated");
                res.headers_mut()
                    .insert("HX-Trigger", render::hx_trigger_value(&["alertsUpdated"]));
            }
            res
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}

pub async fn module_body(state: &AppState, session: &Session) -> Result<String, String> {
    let list = list_html(state, session, None).await?;

    let ctx = json!({
        "conditions": CONDITIONS,
        "symbols": SYMBOLS,
        "list_html": list,
    });

    render::render_page(state, "modules/alerts", &ctx)
}

// ---------------- Pages ----------------

// GET /alerts
pub async fn get_alerts_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    home_controller::show_module(&state, &headers, &jar, &session, Module::Alerts).await
}

// ---------------- Partials ----------------

// GET /alerts/list
pub async fn get_alerts_list(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    list_response(&state, &session, false, None).await
}

#[derive(Deserialize, Default)]
pub struct CreateAlertForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub condition: String,
    #[serde(rename = "triggerLevel", default)]
    pub trigger_level: String,
    pub in_app: Option<String>,
    pub web_push: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub webhook: String,
}

impl From<CreateAlertForm> for NewAlert {
    fn from(f: CreateAlertForm) -> Self {
        NewAlert {
            name: f.name,
            symbol: f.symbol,
            condition: f.condition,
            trigger_level: f.trigger_level,
            notifications: Notifications {
                in_app: f.in_app.is_some(),
                web_push: f.web_push.is_some(),
                email: f.email.is_some(),
                webhook: f.webhook.trim().to_string(),
            },
        }
    }
}

// POST /alerts
pub async fn post_create_alert(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Form(form): Form<CreateAlertForm>,
) -> Response {
    let created = {
        let mut book = session.alerts.write().await;
        book.create(form.into(), Utc::now().timestamp()).map(|a| a.id.clone())
    };

    match created {
        Ok(id) => {
            tracing::debug!(session = session.short_id(), alert = %id, "alert created");
            list_response(&state, &session, true, None).await
        }
        Err(e) => list_response(&state, &session, false, Some(e)).await,
    }
}

// POST /alerts/:id/toggle
pub async fn post_toggle_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    let toggled = session.alerts.write().await.toggle(&id).is_some();
    list_response(&state, &session, toggled, None).await
}

// POST /alerts/:id/delete
pub async fn post_delete_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Response {
    let deleted = session.alerts.write().await.delete(&id);
    list_response(&state, &session, deleted, None).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::alerts_service::parse_float_or_zero;

    #[test]
    fn form_maps_checkboxes_and_keeps_raw_level() {
        let form = CreateAlertForm {
            name: "Dip".into(),
            symbol: "nvda".into(),
            condition: "Price Below".into(),
            trigger_level: "abc".into(),
            in_app: Some("on".into()),
            web_push: None,
            email: Some("on".into()),
            webhook: "  ".into(),
        };

        let new: NewAlert = form.into();
        assert!(new.notifications.in_app);
        assert!(!new.notifications.web_push);
        assert!(new.notifications.email);
        assert_eq!(new.notifications.webhook, "");
        assert_eq!(parse_float_or_zero(&new.trigger_level), 0.0);
    }

    #[test]
    fn timestamps_render_in_utc() {
        assert_eq!(fmt_ts(0), "1970-01-01 00:00");
    }
}
