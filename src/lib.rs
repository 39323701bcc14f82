//! Library entrypoint for InvestorDesk.
//!
//! Integration tests under `tests/` import the app state, routers,
//! controllers and services from here.

pub mod config;
pub mod error;
pub mod models;

#[path = "middleware/auth.rs"]
pub mod auth;

pub mod services;

#[path = "views/render.rs"]
pub mod render;
#[path = "views/templates.rs"]
pub mod templates;

pub mod controllers;
pub mod routes;

use services::{
    session_service::SessionStore,
    ticker_service::{LoginTicker, SharedLoginTicker},
};

#[derive(Clone)]
pub struct AppState {
    pub hbs: templates::Hbs,
    pub settings: config::Settings,
    pub sessions: SessionStore,
    pub login_ticker: SharedLoginTicker,
    /// Events for anonymous login-page listeners.
    pub events_tx: tokio::sync::broadcast::Sender<String>,
}

impl AppState {
    pub fn new(settings: config::Settings) -> Result<Self, handlebars::TemplateError> {
        let hbs = templates::build_handlebars(&settings.templates_dir)?;
        let (events_tx, _events_rx) = tokio::sync::broadcast::channel::<String>(64);

        Ok(Self {
            hbs,
            settings,
            sessions: SessionStore::new(),
            login_ticker: LoginTicker::shared(),
            events_tx,
        })
    }
}
