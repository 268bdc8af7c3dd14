//! WebSocket transport for delta event streams.

use std::{fmt::Display, sync::Arc};

use async_trait::async_trait;
use axum::{
    Router,
    extract::{
        Query, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::{IntoResponse, Response},
    routing::get,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use threadsim_core::{DeltaEvent, DeltaStreamer, EventSink, SinkError};
use threadsim_session::SessionManager;

use crate::{
    lookup::{SessionQuery, watch_session},
    protocol::ServerMessage,
};

/// `EventSink` writing JSON text frames.
pub struct WsSink<S> {
    sender: S,
}

impl<S> WsSink<S>
where
    S: Sink<Message> + Unpin + Send,
    S::Error: Display,
{
    #[must_use]
    pub const fn new(sender: S) -> Self {
        Self { sender }
    }

    /// Close the underlying socket.
    ///
    /// # Errors
    /// Returns error if the close frame cannot be sent.
    pub async fn close(&mut self) -> Result<(), SinkError> {
        self.sender
            .close()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))
    }
}

#[async_trait]
impl<S> EventSink for WsSink<S>
where
    S: Sink<Message> + Unpin + Send,
    S::Error: Display,
{
    async fn send(&mut self, event: DeltaEvent) -> Result<(), SinkError> {
        let json = serde_json::to_string(&ServerMessage::from_event(&event))
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        self.sender
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))
    }
}

/// WebSocket upgrade handler for `GET /ws?id=`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(manager): State<Arc<SessionManager>>,
    Query(query): Query<SessionQuery>,
) -> Response {
    match watch_session(&manager, query.id.as_deref()) {
        Ok(streamer) => ws
            .on_upgrade(|socket| stream_to_socket(socket, streamer))
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn stream_to_socket(socket: WebSocket, streamer: DeltaStreamer) {
    let session_id = streamer.session().id();
    let (sender, mut receiver) = socket.split();
    let mut sink = WsSink::new(sender);

    tracing::info!(%session_id, "WebSocket connected");

    let outcome = tokio::select! {
        result = streamer.forward(&mut sink) => Some(result),
        () = drain(&mut receiver) => None,
    };

    match outcome {
        Some(Ok(())) => {
            if let Err(e) = sink.close().await {
                tracing::debug!(%session_id, "Failed to close WebSocket: {e}");
            }
        }
        Some(Err(e)) => tracing::debug!(%session_id, "Observer dropped: {e}"),
        None => tracing::debug!(%session_id, "WebSocket closed by client"),
    }
}

/// Read until the client goes away. Observers never send anything we act on.
async fn drain<S, E>(receiver: &mut S)
where
    S: Stream<Item = Result<Message, E>> + Unpin,
{
    while let Some(msg) = receiver.next().await {
        if matches!(msg, Ok(Message::Close(_)) | Err(_)) {
            break;
        }
    }
}

/// Create WebSocket router.
///
/// # Example
/// ```ignore
/// let app = Router::new()
///     .merge(ws_router(manager));
/// ```
#[must_use]
pub fn ws_router(manager: Arc<SessionManager>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(manager)
}
