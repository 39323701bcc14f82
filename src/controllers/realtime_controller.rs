use std::{convert::Infallible, time::Duration as StdDuration};

use axum::{
    extract::{Extension, State},
    response::sse::{Event, KeepAlive, Sse},
};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::{auth::CurrentSession, AppState};

/// Each event name becomes an SSE event; the page re-dispatches it for htmx.
/// The stream ends once the sender side is gone.
fn event_stream(
    rx: broadcast::Receiver<String>,
) -> impl futures_util::stream::Stream<Item = Result<Event, Infallible>> {
    futures_util::stream::unfold(rx, |mut rx| async {
        let evt = match rx.recv().await {
            Ok(name) => Event::default().event(name).data("1"),
            Err(RecvError::Lagged(_)) => Event::default().event("ping").data("lagged"),
            Err(RecvError::Closed) => return None,
        };

        Some((Ok(evt), rx))
    })
}

fn keep_alive() -> KeepAlive {
    KeepAlive::new()
        .interval(StdDuration::from_secs(20))
        .text("keep-alive")
}

// GET /events  (SSE, per session)
pub async fn sse_events(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Sse<impl futures_util::stream::Stream<Item = Result<Event, Infallible>>> {
    Sse::new(event_stream(session.subscribe())).keep_alive(keep_alive())
}

// GET /events/public  (SSE, login page)
pub async fn sse_public(
    State(state): State<AppState>,
) -> Sse<impl futures_util::stream::Stream<Item = Result<Event, Infallible>>> {
    Sse::new(event_stream(state.events_tx.subscribe())).keep_alive(keep_alive())
}
