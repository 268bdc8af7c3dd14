//! Core traits for text generation and event delivery.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{DeltaEvent, Stance};

/// Text generation error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Provider returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Provider returned no content")]
    EmptyResponse,
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("Invalid stance selection: {0}")]
    InvalidStances(String),
}

/// External text generation service.
///
/// Each call is attempted exactly once; callers never retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Choose the stances that will take part in a thread.
    ///
    /// Implementations return 5 to 8 entries drawn from `catalog`,
    /// duplicates allowed.
    async fn select_stances(
        &self,
        category: &str,
        prompt: &str,
        catalog: &[Stance],
    ) -> Result<Vec<Stance>, GenerationError>;

    /// Write one top-level remark addressed to `prompt` from `stance`.
    async fn generate_comment(&self, prompt: &str, stance: &Stance)
    -> Result<String, GenerationError>;

    /// Write one reply to `parent_text` under the original `prompt`.
    async fn generate_reply(&self, prompt: &str, parent_text: &str)
    -> Result<String, GenerationError>;
}

/// Event delivery error.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink closed")]
    Closed,
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Destination for one observer's delta events.
#[async_trait]
pub trait EventSink: Send {
    /// Deliver a single event.
    async fn send(&mut self, event: DeltaEvent) -> Result<(), SinkError>;
}

#[async_trait]
impl EventSink for mpsc::UnboundedSender<DeltaEvent> {
    async fn send(&mut self, event: DeltaEvent) -> Result<(), SinkError> {
        mpsc::UnboundedSender::send(self, event).map_err(|_| SinkError::Closed)
    }
}

#[async_trait]
impl EventSink for mpsc::Sender<DeltaEvent> {
    async fn send(&mut self, event: DeltaEvent) -> Result<(), SinkError> {
        mpsc::Sender::send(self, event)
            .await
            .map_err(|_| SinkError::Closed)
    }
}
