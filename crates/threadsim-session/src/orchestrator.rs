//! Generation orchestration for a single session.
//!
//! Top-level remarks are generated one at a time in stance order and the
//! first failure stops the rest. Each remark that lands gets its own reply
//! task; reply failures only cost that branch. The session is marked
//! complete once top-level generation has stopped and every reply task
//! has finished.

use std::sync::Arc;

use threadsim_core::{Comment, Session, Stance, TextGenerator, catalog};
use tokio::task::{JoinHandle, JoinSet};
use tracing::Instrument;

/// Drives sessions from empty to complete.
#[derive(Clone)]
pub struct Orchestrator {
    generator: Arc<dyn TextGenerator>,
    catalog: Arc<[Stance]>,
}

impl Orchestrator {
    /// Create an orchestrator selecting from the built-in catalog.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            catalog: catalog().into(),
        }
    }

    /// Select stances from `catalog` instead of the built-in one.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Vec<Stance>) -> Self {
        self.catalog = catalog.into();
        self
    }

    /// Run `session` as a detached task.
    pub fn spawn(&self, session: Arc<Session>) -> JoinHandle<()> {
        let orchestrator = self.clone();
        let span = tracing::info_span!("orchestrator", session_id = %session.id());
        tokio::spawn(async move { orchestrator.run(session).await }.instrument(span))
    }

    /// Generate everything for `session`, then mark it complete.
    pub async fn run(&self, session: Arc<Session>) {
        let stances = match self
            .generator
            .select_stances(session.category(), session.prompt(), &self.catalog)
            .await
        {
            Ok(stances) => stances,
            Err(e) => {
                tracing::error!("Failed to select stances: {e}");
                session.record_failure(e);
                session.mark_complete();
                return;
            }
        };

        if let Err(e) = session.set_stances(stances.clone()) {
            tracing::error!("Session already in progress: {e}");
            return;
        }

        let mut replies = JoinSet::new();

        for stance in &stances {
            let text = match self.generator.generate_comment(session.prompt(), stance).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(stance = %stance.handle(), "Failed to generate comment: {e}");
                    session.record_failure(e);
                    break;
                }
            };

            let index = session.push_comment(Comment::from_stance(stance, text.clone()));
            replies.spawn(
                reply_to(Arc::clone(&self.generator), Arc::clone(&session), index, text)
                    .in_current_span(),
            );
        }

        while let Some(result) = replies.join_next().await {
            if let Err(e) = result {
                tracing::error!("Reply task failed: {e}");
            }
        }

        session.mark_complete();
        tracing::info!(
            comments = session.comment_count(),
            failed = session.failure().is_some(),
            "Session complete"
        );
    }
}

async fn reply_to(
    generator: Arc<dyn TextGenerator>,
    session: Arc<Session>,
    parent_index: usize,
    parent_text: String,
) {
    match generator.generate_reply(session.prompt(), &parent_text).await {
        Ok(text) => {
            if let Err(e) = session.push_reply(parent_index, Comment::reply(text)) {
                tracing::error!(parent_index, "Failed to store reply: {e}");
            }
        }
        Err(e) => tracing::warn!(parent_index, "Failed to generate reply: {e}"),
    }
}
