//! In-memory session store.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use threadsim_core::{Session, SessionId};
use uuid::Uuid;

/// In-memory session store.
///
/// Sessions live for the lifetime of the process; nothing is evicted.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new empty session under a fresh identifier.
    pub fn create(&self, prompt: impl Into<String>, category: impl Into<String>) -> Arc<Session> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);

        let mut id = Uuid::new_v4();
        while sessions.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let session = Arc::new(Session::new(id, prompt, category));
        sessions.insert(id, Arc::clone(&session));
        drop(sessions);

        tracing::info!(session_id = %id, "Created session");
        session
    }

    /// Look up a session by identifier.
    #[must_use]
    pub fn get(&self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Number of registered sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
