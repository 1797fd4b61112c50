//! Notification stream controller.

use crate::state::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::stream::Stream;
use std::convert::Infallible;
use tracing::debug;

/// Creates the notification router.
pub fn router() -> Router<AppState> {
    Router::new().route("/stream", get(stream_notifications))
}

/// Streams lifecycle events as server-sent events.
///
/// Each connection is its own subscription: it observes events published
/// after it was opened, in publish order, and ends when the bus is closed.
async fn stream_notifications(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("New notification stream subscriber");

    let subscription = state.bus.subscribe();
    let stream = futures::stream::unfold(subscription, |mut subscription| async move {
        let event = subscription.recv().await?;
        let sse_event = Event::default()
            .event(event.event_type.to_string())
            .json_data(&event)
            .ok()?;
        Some((Ok(sse_event), subscription))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
