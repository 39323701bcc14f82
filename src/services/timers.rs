//! Background tasks that keep a session's modules moving.
//!
//! Every task holds only a `Weak<Session>`, so dropping the session from the
//! store is enough to let them wind down; `SessionTimers` aborts them eagerly.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Local;
use rand::{SeedableRng, rngs::StdRng};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;

use crate::services::{
    session_service::{ClockTick, Session, SessionStore},
    ticker_service::{self, SharedLoginTicker},
};

const CLOCK_PERIOD: Duration = Duration::from_secs(1);
const TOP_TICKER_PERIOD: Duration = Duration::from_secs(2);
const SYNC_PERIOD: Duration = Duration::from_secs(1);
const WATCHLIST_PERIOD: Duration = Duration::from_secs(3);
const LOGIN_TICKER_PERIOD: Duration = Duration::from_secs(5);

/// Owns a session's timer tasks. Dropping it aborts all of them.
pub struct SessionTimers {
    handles: Vec<JoinHandle<()>>,
}

impl SessionTimers {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for SessionTimers {
    fn drop(&mut self) {
        for h in &self.handles {
            h.abort();
        }
    }
}

pub async fn start(store: &SessionStore, session: &Arc<Session>) {
    let weak = Arc::downgrade(session);

    let timers = SessionTimers {
        handles: vec![
            spawn_clock(store.clone(), weak.clone()),
            spawn_top_ticker(weak.clone()),
            spawn_sync_counter(weak.clone()),
            spawn_watchlist(weak.clone()),
            spawn_chart(weak),
        ],
    };

    tracing::debug!(session = session.short_id(), tasks = timers.len(), "session timers started");
    session.install_timers(timers).await;
}

fn spawn_clock(store: SessionStore, session: Weak<Session>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(CLOCK_PERIOD);
        interval.tick().await;

        loop {
            interval.tick().await;
            let Some(s) = session.upgrade() else { break };

            let tick = s.shell.write().await.clock.tick();
            match tick {
                ClockTick::Running(_) => s.notify("sessionTick"),
                ClockTick::Expired => {
                    s.notify("sessionExpired");
                    store.remove(&s.id).await;
                    tracing::info!(session = s.short_id(), "session timed out");
                    s.stop_timers().await;
                    break;
                }
                ClockTick::Idle => {
                    tracing::debug!(session = s.short_id(), "session clock idle");
                    break;
                }
            }
        }
    })
}

fn spawn_top_ticker(session: Weak<Session>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = StdRng::from_entropy();
        let mut interval = time::interval(TOP_TICKER_PERIOD);
        interval.tick().await;

        loop {
            interval.tick().await;
            let Some(s) = session.upgrade() else { break };

            ticker_service::perturb_top(&mut *s.top_ticker.write().await, &mut rng);
            s.notify("tickerUpdated");
        }
    })
}

fn spawn_sync_counter(session: Weak<Session>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(SYNC_PERIOD);
        interval.tick().await;

        loop {
            interval.tick().await;
            let Some(s) = session.upgrade() else { break };

            ticker_service::bump_sync(&mut *s.top_ticker.write().await);
            s.notify("tickerUpdated");
        }
    })
}

fn spawn_watchlist(session: Weak<Session>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = StdRng::from_entropy();
        let mut interval = time::interval(WATCHLIST_PERIOD);
        interval.tick().await;

        loop {
            interval.tick().await;
            let Some(s) = session.upgrade() else { break };

            s.watchlist.write().await.perturb(&mut rng);
            s.notify("watchlistUpdated");
        }
    })
}

// The period follows the selected interval, so it is re-read every round.
fn spawn_chart(session: Weak<Session>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = StdRng::from_entropy();

        loop {
            let period = match session.upgrade() {
                Some(s) => s.chart.read().await.tick_period(),
                None => break,
            };

            time::sleep(period).await;
            let Some(s) = session.upgrade() else { break };

            if s.chart.write().await.tick(&mut rng, Local::now()) {
                s.notify("chartUpdated");
            }
        }
    })
}

/// The login page ticker is shared, so it runs for the life of the server.
pub fn spawn_login_ticker(
    ticker: SharedLoginTicker,
    events_tx: broadcast::Sender<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = StdRng::from_entropy();
        let mut interval = time::interval(LOGIN_TICKER_PERIOD);
        interval.tick().await;

        loop {
            interval.tick().await;
            ticker.write().await.perturb(&mut rng);
            let _ = events_tx.send("loginTickerUpdated".to_string());
        }
    })
}
