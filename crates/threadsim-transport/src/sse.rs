//! Server-Sent Events transport for delta event streams.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use futures::StreamExt;
use threadsim_session::SessionManager;

use crate::{
    lookup::{SessionQuery, watch_session},
    protocol::ServerMessage,
};

/// SSE handler for `GET /events?id=`; one `message` event per delta.
pub async fn sse_handler(
    State(manager): State<Arc<SessionManager>>,
    Query(query): Query<SessionQuery>,
) -> Response {
    match watch_session(&manager, query.id.as_deref()) {
        Ok(streamer) => {
            let events = streamer
                .into_stream()
                .map(|event| Event::default().json_data(ServerMessage::from_event(&event)));
            Sse::new(events)
                .keep_alive(KeepAlive::default())
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Create SSE router.
#[must_use]
pub fn sse_router(manager: Arc<SessionManager>) -> Router {
    Router::new()
        .route("/events", get(sse_handler))
        .with_state(manager)
}
