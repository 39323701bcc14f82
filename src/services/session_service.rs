//! Per-login dashboard state.
//!
//! A `Session` owns one lock per module, so a module's timer only ever
//! contends with requests for that same module. Sessions live in the
//! in-memory `SessionStore` until logout or timeout; nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use rand::{SeedableRng, rngs::StdRng};
use tokio::sync::{Mutex, RwLock, broadcast};

use crate::models::{Module, ScreenerResult, Theme, TopTicker};
use crate::services::{
    alerts_service::AlertBook,
    chart_service::ChartState,
    screener_service,
    sharing_service::SharingSettings,
    timers::{self, SessionTimers},
    watchlist_service::Watchlist,
};
use crate::AppState;

const EVENTS_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    Running(u32),
    /// Hit zero on this tick; the clock is now logged out and reset.
    Expired,
    /// Already logged out; nothing counted.
    Idle,
}

/// One-second countdown that logs the session out when it reaches zero.
#[derive(Debug, Clone)]
pub struct SessionClock {
    initial: u32,
    remaining: u32,
    authenticated: bool,
}

impl SessionClock {
    pub fn new(initial: u32) -> Self {
        Self {
            initial,
            remaining: initial,
            authenticated: true,
        }
    }

    pub fn tick(&mut self) -> ClockTick {
        if !self.authenticated {
            return ClockTick::Idle;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.authenticated = false;
            self.remaining = self.initial;
            return ClockTick::Expired;
        }

        ClockTick::Running(self.remaining)
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn deauthenticate(&mut self) {
        self.authenticated = false;
        self.remaining = self.initial;
    }

    /// `m:ss`, as on the countdown badge.
    pub fn badge(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

#[derive(Debug, Clone)]
pub struct Shell {
    pub theme: Theme,
    pub active_module: Module,
    pub clock: SessionClock,
}

pub struct Session {
    pub id: String,
    pub shell: RwLock<Shell>,
    pub top_ticker: RwLock<TopTicker>,
    pub watchlist: RwLock<Watchlist>,
    pub alerts: RwLock<AlertBook>,
    // generated once, never ticked
    pub screener: RwLock<Vec<ScreenerResult>>,
    pub chart: RwLock<ChartState>,
    pub sharing: RwLock<SharingSettings>,

    events_tx: broadcast::Sender<String>,
    timers: Mutex<Option<SessionTimers>>,
}

impl Session {
    pub fn new(id: String, timeout_secs: u32) -> Self {
        let mut rng = StdRng::from_entropy();
        let (events_tx, _) = broadcast::channel(EVENTS_CAPACITY);

        Self {
            id,
            shell: RwLock::new(Shell {
                theme: Theme::default(),
                active_module: Module::default(),
                clock: SessionClock::new(timeout_secs),
            }),
            top_ticker: RwLock::new(TopTicker::default()),
            watchlist: RwLock::new(Watchlist::seeded()),
            alerts: RwLock::new(AlertBook::seeded(Utc::now().timestamp())),
            screener: RwLock::new(screener_service::generate(&mut rng)),
            chart: RwLock::new(ChartState::new(&mut rng, Local::now())),
            sharing: RwLock::new(SharingSettings::default()),
            events_tx,
            timers: Mutex::new(None),
        }
    }

    /// First 8 characters, for logs.
    pub fn short_id(&self) -> &str {
        &self.id[..self.id.len().min(8)]
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.events_tx.subscribe()
    }

    /// Publishes an event name to SSE/websocket listeners. No listeners is fine.
    pub fn notify(&self, event: &str) {
        let _ = self.events_tx.send(event.to_string());
    }

    pub async fn is_authenticated(&self) -> bool {
        self.shell.read().await.clock.is_authenticated()
    }

    pub async fn install_timers(&self, t: SessionTimers) {
        *self.timers.lock().await = Some(t);
    }

    /// Aborts every module timer. Safe to call more than once.
    pub async fn stop_timers(&self) {
        let taken = self.timers.lock().await.take();
        if taken.is_some() {
            tracing::debug!(session = self.short_id(), "session timers stopped");
        }
        drop(taken);
    }
}

pub fn new_session_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Arc<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and registers a session. Timers are not started.
    pub async fn create(&self, timeout_secs: u32) -> Arc<Session> {
        let session = Arc::new(Session::new(new_session_id(), timeout_secs));
        self.inner
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        session
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.inner.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &str) -> Option<Arc<Session>> {
        self.inner.write().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

/// The login button: waits the configured delay, then hands out a fresh
/// authenticated session with its timers running. Nothing is checked.
pub async fn login(state: &AppState) -> Arc<Session> {
    if state.settings.login_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(state.settings.login_delay_ms)).await;
    }

    let session = state.sessions.create(state.settings.session_timeout_secs).await;
    timers::start(&state.sessions, &session).await;

    tracing::info!(session = session.short_id(), "session started");
    session
}

pub async fn logout(state: &AppState, session_id: &str) {
    if let Some(session) = state.sessions.remove(session_id).await {
        session.shell.write().await.clock.deauthenticate();
        session.stop_timers().await;
        // lets open SSE and websocket streams close
        session.notify("sessionExpired");
        tracing::info!(session = session.short_id(), "session ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_hits_zero_after_full_timeout_then_resets() {
        let mut clock = SessionClock::new(900);

        for expected in (1..900).rev() {
            assert_eq!(clock.tick(), ClockTick::Running(expected));
        }
        assert!(clock.is_authenticated());
        assert_eq!(clock.remaining(), 1);

        // tick 900 reaches zero
        assert_eq!(clock.tick(), ClockTick::Expired);
        assert!(!clock.is_authenticated());
        assert_eq!(clock.remaining(), 900);

        assert_eq!(clock.tick(), ClockTick::Idle);
        assert_eq!(clock.remaining(), 900);
    }

    #[test]
    fn badge_formats_minutes_and_seconds() {
        let mut clock = SessionClock::new(900);
        assert_eq!(clock.badge(), "15:00");
        clock.tick();
        assert_eq!(clock.badge(), "14:59");

        let mut short = SessionClock::new(65);
        for _ in 0..60 {
            short.tick();
        }
        assert_eq!(short.badge(), "0:05");
    }

    #[tokio::test]
    async fn store_create_get_remove() {
        let store = SessionStore::new();
        let s = store.create(900).await;

        assert_eq!(s.id.len(), 32);
        assert!(store.get(&s.id).await.is_some());
        assert!(s.is_authenticated().await);
        assert_eq!(s.screener.read().await.len(), 15);
        assert_eq!(s.chart.read().await.series.len(), 50);

        assert!(store.remove(&s.id).await.is_some());
        assert!(store.get(&s.id).await.is_none());
        assert!(store.is_empty().await);
    }
}
