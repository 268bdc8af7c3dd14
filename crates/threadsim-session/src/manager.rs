//! Session manager: the submission, lookup, and observation entry points.

use std::sync::Arc;

use threadsim_core::{DeltaStreamer, Session, SessionId, StreamerConfig, TextGenerator};

use crate::{Orchestrator, SessionStore};

/// Session manager error.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("Prompt cannot be empty")]
    EmptyPrompt,
    #[error("Session not found: {0}")]
    NotFound(SessionId),
}

/// Owns the session store and starts generation for new sessions.
pub struct SessionManager {
    store: SessionStore,
    orchestrator: Orchestrator,
    streamer_config: StreamerConfig,
}

impl SessionManager {
    /// Create a manager generating with `generator`.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self::with_orchestrator(Orchestrator::new(generator))
    }

    /// Create a manager around a configured orchestrator.
    #[must_use]
    pub fn with_orchestrator(orchestrator: Orchestrator) -> Self {
        Self {
            store: SessionStore::new(),
            orchestrator,
            streamer_config: StreamerConfig::default(),
        }
    }

    /// Settings for observers created by [`Self::watch`].
    #[must_use]
    pub fn with_streamer_config(mut self, config: StreamerConfig) -> Self {
        self.streamer_config = config;
        self
    }

    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Create a session and start generating for it in the background.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// Returns error if the prompt is empty; no session is created then.
    pub fn start_session(&self, prompt: &str, category: &str) -> Result<SessionId, ManagerError> {
        if prompt.trim().is_empty() {
            return Err(ManagerError::EmptyPrompt);
        }

        let session = self.store.create(prompt, category);
        let session_id = session.id();
        // Detached; completion is observed through the session itself.
        drop(self.orchestrator.spawn(session));

        Ok(session_id)
    }

    /// Look up a session.
    ///
    /// # Errors
    /// Returns error if no session has this identifier.
    pub fn get_session(&self, session_id: SessionId) -> Result<Arc<Session>, ManagerError> {
        self.store
            .get(session_id)
            .ok_or(ManagerError::NotFound(session_id))
    }

    /// Attach a new observer to a session.
    ///
    /// # Errors
    /// Returns error if no session has this identifier.
    pub fn watch(&self, session_id: SessionId) -> Result<DeltaStreamer, ManagerError> {
        let session = self.get_session(session_id)?;
        Ok(DeltaStreamer::new(session, self.streamer_config))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::StreamExt;
    use threadsim_core::DeltaEvent;
    use tokio_test::{assert_err, assert_ok};
    use uuid::Uuid;

    use super::*;
    use crate::testing::{ScriptedGenerator, comment_text, reply_text};

    fn manager(generator: ScriptedGenerator) -> SessionManager {
        SessionManager::new(Arc::new(generator)).with_streamer_config(StreamerConfig {
            poll_interval: Duration::from_millis(20),
        })
    }

    fn summary(events: &[DeltaEvent]) -> Vec<String> {
        events
            .iter()
            .map(|event| match event {
                DeltaEvent::Comment { parent_index, .. } => format!("comment {parent_index}"),
                DeltaEvent::Reply { parent_index, .. } => format!("reply {parent_index}"),
                DeltaEvent::Done => "done".to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected() {
        let manager = manager(ScriptedGenerator::new(5));
        assert!(matches!(
            manager.start_session("   ", "aita"),
            Err(ManagerError::EmptyPrompt)
        ));
        assert!(manager.store().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let manager = manager(ScriptedGenerator::new(5));
        let id = Uuid::new_v4();
        assert!(matches!(
            assert_err!(manager.get_session(id)),
            ManagerError::NotFound(missing) if missing == id
        ));
        assert!(manager.watch(id).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_streams_whole_session() {
        let generator = ScriptedGenerator::new(3)
            .with_reply_delay(|n| Duration::from_millis(50 * (3 - n as u64)));
        let manager = manager(generator);
        let id = assert_ok!(manager.start_session("My neighbor's dog", "relationships"));

        let events: Vec<_> = assert_ok!(manager.watch(id)).into_stream().collect().await;

        let comments: Vec<_> = summary(&events)
            .into_iter()
            .filter(|s| s.starts_with("comment"))
            .collect();
        assert_eq!(comments, ["comment 0", "comment 1", "comment 2"]);
        assert_eq!(events.iter().filter(|e| matches!(e, DeltaEvent::Reply { .. })).count(), 3);
        assert_eq!(events.last(), Some(&DeltaEvent::Done));

        for event in &events {
            if let DeltaEvent::Reply { parent_index, reply } = event {
                assert_eq!(reply.text, reply_text(&comment_text(*parent_index)));
            }
        }

        let session = assert_ok!(manager.get_session(id));
        assert!(session.is_complete());
        assert_eq!(session.prompt(), "My neighbor's dog");
        assert_eq!(session.category(), "relationships");
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_observer_gets_full_history() {
        let manager = manager(ScriptedGenerator::new(5).fail_reply_to(2));
        let id = manager.start_session("post", "aita").unwrap();

        let first: Vec<_> = manager.watch(id).unwrap().into_stream().collect().await;
        let second: Vec<_> = manager.watch(id).unwrap().into_stream().collect().await;

        assert_eq!(
            summary(&second),
            [
                "comment 0", "comment 1", "comment 2", "comment 3", "comment 4", "reply 0",
                "reply 1", "reply 3", "reply 4", "done"
            ]
        );
        assert_eq!(first.len(), second.len());
        assert_eq!(first.last(), Some(&DeltaEvent::Done));
    }
}
