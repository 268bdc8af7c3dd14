//! Shared session state.
//!
//! The orchestrator is the only writer; any number of observers read.
//! Every access to the mutable fields goes through the per-session lock,
//! including the length reads observers use for snapshotting.

use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Notify, futures::Notified};
use uuid::Uuid;

use crate::{Comment, GenerationError, Stance, Thread};

/// Session identifier.
pub type SessionId = Uuid;

/// Violation of the session's append-only discipline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Stances already set")]
    StancesAlreadySet,
    #[error("Stances must be set before any comment is appended")]
    CommentsPresent,
    #[error("No top-level comment at index {0}")]
    UnknownParent(usize),
}

/// Mutable part of a session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    stances: Vec<Stance>,
    stances_set: bool,
    threads: Vec<Thread>,
    complete: bool,
    failure: Option<GenerationError>,
}

impl SessionState {
    #[must_use]
    pub fn stances(&self) -> &[Stance] {
        &self.stances
    }

    /// Top-level comments with their replies, in append order.
    #[must_use]
    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    #[must_use]
    pub const fn failure(&self) -> Option<&GenerationError> {
        self.failure.as_ref()
    }
}

/// One simulated discussion.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    prompt: String,
    category: String,
    created_at: i64,
    state: Mutex<SessionState>,
    changed: Notify,
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

impl Session {
    /// Create an empty session.
    #[must_use]
    pub fn new(id: SessionId, prompt: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            category: category.into(),
            created_at: now(),
            state: Mutex::new(SessionState::default()),
            changed: Notify::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub const fn created_at(&self) -> i64 {
        self.created_at
    }

    // Critical sections never leave the state half-written, so a poisoned
    // lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let result = f(&mut self.lock());
        self.changed.notify_waiters();
        result
    }

    /// Run `f` against a consistent view of the state.
    ///
    /// The lock is held for the whole call, so no append can be
    /// observed half-way.
    pub fn with_state<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.lock())
    }

    /// Future that resolves on the next state change.
    ///
    /// Changes made before the future is created or enabled are not
    /// reported.
    pub fn notified(&self) -> Notified<'_> {
        self.changed.notified()
    }

    /// Store the selected stances.
    ///
    /// # Errors
    /// Returns error if stances were already stored or comments exist.
    pub fn set_stances(&self, stances: Vec<Stance>) -> Result<(), SessionError> {
        self.mutate(|state| {
            if state.stances_set {
                return Err(SessionError::StancesAlreadySet);
            }
            if !state.threads.is_empty() {
                return Err(SessionError::CommentsPresent);
            }
            state.stances = stances;
            state.stances_set = true;
            Ok(())
        })
    }

    /// Append a top-level comment and return its stable index.
    pub fn push_comment(&self, comment: Comment) -> usize {
        self.mutate(|state| {
            state.threads.push(Thread::new(comment));
            state.threads.len() - 1
        })
    }

    /// Append a reply under the top-level comment at `parent`.
    ///
    /// # Errors
    /// Returns error if no comment exists at `parent`.
    pub fn push_reply(&self, parent: usize, reply: Comment) -> Result<usize, SessionError> {
        self.mutate(|state| {
            let thread = state
                .threads
                .get_mut(parent)
                .ok_or(SessionError::UnknownParent(parent))?;
            thread.replies.push(reply);
            Ok(thread.replies.len() - 1)
        })
    }

    /// Record a generation failure. The first failure wins.
    ///
    /// Returns `true` if this call stored the failure.
    pub fn record_failure(&self, error: GenerationError) -> bool {
        self.mutate(|state| {
            if state.failure.is_some() {
                return false;
            }
            state.failure = Some(error);
            true
        })
    }

    /// Mark the session complete.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn mark_complete(&self) -> bool {
        self.mutate(|state| !std::mem::replace(&mut state.complete, true))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.lock().complete
    }

    #[must_use]
    pub fn failure(&self) -> Option<GenerationError> {
        self.lock().failure.clone()
    }

    #[must_use]
    pub fn stances(&self) -> Vec<Stance> {
        self.lock().stances.clone()
    }

    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.lock().threads.len()
    }

    /// Serializable copy of the whole session.
    #[must_use]
    pub fn view(&self) -> SessionView {
        let state = self.lock();
        SessionView {
            id: self.id,
            prompt: self.prompt.clone(),
            category: self.category.clone(),
            created_at: self.created_at,
            stances: state.stances.clone(),
            threads: state.threads.clone(),
            complete: state.complete,
            failure: state.failure.as_ref().map(ToString::to_string),
        }
    }
}

/// Point-in-time copy of a session, as returned by lookups.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: SessionId,
    pub prompt: String,
    pub category: String,
    pub created_at: i64,
    pub stances: Vec<Stance>,
    pub threads: Vec<Thread>,
    pub complete: bool,
    pub failure: Option<String>,
}
