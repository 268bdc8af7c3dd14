//! Scripted generator for orchestration tests.

use std::{
    collections::HashSet,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use threadsim_core::{GenerationError, Stance, TextGenerator, catalog};

pub fn comment_text(n: usize) -> String {
    format!("comment #{n}")
}

pub fn reply_text(parent: &str) -> String {
    format!("re: {parent}")
}

fn comment_number(text: &str) -> Option<usize> {
    text.strip_prefix("comment #")?.parse().ok()
}

fn boom() -> GenerationError {
    GenerationError::Api {
        status: 500,
        message: "boom".into(),
    }
}

/// Deterministic `TextGenerator` whose failures and delays are set up front.
pub struct ScriptedGenerator {
    stances: Result<Vec<Stance>, GenerationError>,
    fail_comment_at: Option<usize>,
    fail_replies_to: HashSet<usize>,
    reply_delay: fn(usize) -> Duration,
    pub comment_calls: AtomicUsize,
    pub reply_calls: AtomicUsize,
}

impl ScriptedGenerator {
    /// Selects the first `count` catalog stances and never fails.
    pub fn new(count: usize) -> Self {
        Self {
            stances: Ok(catalog().iter().take(count).cloned().collect()),
            fail_comment_at: None,
            fail_replies_to: HashSet::new(),
            reply_delay: |_| Duration::ZERO,
            comment_calls: AtomicUsize::new(0),
            reply_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_selection() -> Self {
        Self {
            stances: Err(GenerationError::InvalidStances("no function call".into())),
            ..Self::new(0)
        }
    }

    /// Fail the `n`th (zero-based) top-level generation.
    pub fn fail_comment_at(mut self, n: usize) -> Self {
        self.fail_comment_at = Some(n);
        self
    }

    /// Fail the reply to comment number `n`.
    pub fn fail_reply_to(mut self, n: usize) -> Self {
        self.fail_replies_to.insert(n);
        self
    }

    /// Delay each reply by a function of its parent's number.
    pub fn with_reply_delay(mut self, delay: fn(usize) -> Duration) -> Self {
        self.reply_delay = delay;
        self
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn select_stances(
        &self,
        _category: &str,
        _prompt: &str,
        _catalog: &[Stance],
    ) -> Result<Vec<Stance>, GenerationError> {
        self.stances.clone()
    }

    async fn generate_comment(
        &self,
        _prompt: &str,
        _stance: &Stance,
    ) -> Result<String, GenerationError> {
        let n = self.comment_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_comment_at == Some(n) {
            return Err(boom());
        }
        Ok(comment_text(n))
    }

    async fn generate_reply(
        &self,
        _prompt: &str,
        parent_text: &str,
    ) -> Result<String, GenerationError> {
        self.reply_calls.fetch_add(1, Ordering::SeqCst);
        let n = comment_number(parent_text).unwrap_or_default();
        tokio::time::sleep((self.reply_delay)(n)).await;
        if self.fail_replies_to.contains(&n) {
            return Err(boom());
        }
        Ok(reply_text(parent_text))
    }
}
