//! Incremental delivery of session state to observers.
//!
//! Each observer owns a `DeltaCursor` recording what it has already been
//! sent. Polling a session through the cursor yields exactly the new
//! top-level comments, new replies, and finally a single `Done`.

use std::{sync::Arc, time::Duration};

use futures::{
    StreamExt,
    stream::{self, BoxStream},
};

use crate::{Comment, EventSink, Session, SessionState, SinkError};

/// Default wait between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// One unit of incremental information for an observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaEvent {
    /// A new top-level comment, without its replies.
    Comment { parent_index: usize, comment: Comment },
    /// A new reply under the top-level comment at `parent_index`.
    Reply { parent_index: usize, reply: Comment },
    /// The session is complete and fully drained. Always the last event.
    Done,
}

/// Streamer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamerConfig {
    /// Upper bound on the wait between polls.
    pub poll_interval: Duration,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Per-observer record of what has been sent.
#[derive(Debug, Clone, Default)]
pub struct DeltaCursor {
    sent_top_level: usize,
    sent_replies: Vec<usize>,
    done: bool,
}

impl DeltaCursor {
    /// Cursor that has sent nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of top-level comments already sent.
    #[must_use]
    pub const fn sent_top_level(&self) -> usize {
        self.sent_top_level
    }

    /// Whether `Done` has been produced.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Events not yet sent for `state`, in delivery order.
    ///
    /// The cursor advances as though every returned event was delivered.
    /// `Done` is appended once `state` is complete; because `state` is a
    /// consistent view, everything before it has been drained by then.
    pub fn advance(&mut self, state: &SessionState) -> Vec<DeltaEvent> {
        if self.done {
            return Vec::new();
        }

        let threads = state.threads();
        let mut events = Vec::new();

        for (index, thread) in threads.iter().enumerate().skip(self.sent_top_level) {
            events.push(DeltaEvent::Comment {
                parent_index: index,
                comment: thread.comment.clone(),
            });
            self.sent_replies.push(0);
        }
        self.sent_top_level = threads.len();

        for (index, (sent, thread)) in self.sent_replies.iter_mut().zip(threads).enumerate() {
            events.extend(thread.replies.iter().skip(*sent).map(|reply| DeltaEvent::Reply {
                parent_index: index,
                reply: reply.clone(),
            }));
            *sent = thread.replies.len();
        }

        if state.is_complete() {
            self.done = true;
            events.push(DeltaEvent::Done);
        }

        events
    }
}

/// Polls one session on behalf of one observer.
pub struct DeltaStreamer {
    session: Arc<Session>,
    cursor: DeltaCursor,
    config: StreamerConfig,
}

impl DeltaStreamer {
    /// Attach a fresh observer to `session`.
    #[must_use]
    pub fn new(session: Arc<Session>, config: StreamerConfig) -> Self {
        Self {
            session,
            cursor: DeltaCursor::new(),
            config,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Whether `Done` has been produced.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.cursor.is_done()
    }

    /// Wait for the next non-empty batch of events.
    ///
    /// Between polls this waits up to the configured interval, waking
    /// early when the session changes. Returns an empty batch once
    /// finished. A session that never completes keeps this pending.
    pub async fn next_batch(&mut self) -> Vec<DeltaEvent> {
        let session = Arc::clone(&self.session);
        loop {
            if self.cursor.is_done() {
                return Vec::new();
            }

            // Enabled before the snapshot so a change racing the poll
            // still wakes the wait below.
            let notified = session.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let batch = session.with_state(|state| self.cursor.advance(state));
            if !batch.is_empty() {
                return batch;
            }

            tokio::select! {
                () = tokio::time::sleep(self.config.poll_interval) => {}
                () = notified => {}
            }
        }
    }

    /// Stream of events, ending after `Done`.
    #[must_use]
    pub fn into_stream(self) -> BoxStream<'static, DeltaEvent> {
        stream::unfold(self, |mut streamer| async move {
            if streamer.is_finished() {
                return None;
            }
            let batch = streamer.next_batch().await;
            Some((stream::iter(batch), streamer))
        })
        .flatten()
        .boxed()
    }

    /// Deliver every event to `sink` until `Done` has been sent.
    ///
    /// # Errors
    /// Returns the first sink error; nothing further is delivered after it.
    pub async fn forward<S>(mut self, sink: &mut S) -> Result<(), SinkError>
    where
        S: EventSink + ?Sized,
    {
        while !self.is_finished() {
            for event in self.next_batch().await {
                sink.send(event).await?;
            }
        }
        tracing::debug!(session_id = %self.session.id(), "Observer drained");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use tokio::{sync::mpsc, time::Instant};
    use tokio_stream::wrappers::UnboundedReceiverStream;
    use tokio_test::{assert_err, assert_ok};
    use uuid::Uuid;

    use super::*;
    use crate::GenerationError;

    fn session() -> Arc<Session> {
        Arc::new(Session::new(Uuid::new_v4(), "Should I skip the wedding?", "aita"))
    }

    fn top(text: &str) -> Comment {
        Comment::new("neutral_both_sides", "neutral", text)
    }

    fn config(ms: u64) -> StreamerConfig {
        StreamerConfig {
            poll_interval: Duration::from_millis(ms),
        }
    }

    /// Ordering guarantees every observer's stream must satisfy.
    fn assert_well_ordered(events: &[DeltaEvent]) {
        let mut next_top = 0;
        let mut done_seen = false;
        for event in events {
            assert!(!done_seen, "event after done: {event:?}");
            match event {
                DeltaEvent::Comment { parent_index, .. } => {
                    assert_eq!(*parent_index, next_top);
                    next_top += 1;
                }
                DeltaEvent::Reply { parent_index, .. } => {
                    assert!(*parent_index < next_top, "reply before its comment");
                }
                DeltaEvent::Done => done_seen = true,
            }
        }
        assert!(done_seen, "stream ended without done");
    }

    fn texts(events: &[DeltaEvent]) -> Vec<String> {
        events
            .iter()
            .map(|event| match event {
                DeltaEvent::Comment { parent_index, comment } => {
                    format!("c{parent_index}:{}", comment.text)
                }
                DeltaEvent::Reply { parent_index, reply } => {
                    format!("r{parent_index}:{}", reply.text)
                }
                DeltaEvent::Done => "done".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_cursor_sends_only_new_items() {
        let session = session();
        let mut cursor = DeltaCursor::new();

        session.push_comment(top("a"));
        let first = session.with_state(|s| cursor.advance(s));
        assert_eq!(texts(&first), ["c0:a"]);

        assert!(session.with_state(|s| cursor.advance(s)).is_empty());

        session.push_reply(0, Comment::reply("a1")).unwrap();
        session.push_comment(top("b"));
        session.push_reply(0, Comment::reply("a2")).unwrap();
        let second = session.with_state(|s| cursor.advance(s));
        assert_eq!(texts(&second), ["c1:b", "r0:a1", "r0:a2"]);
        assert_eq!(cursor.sent_top_level(), 2);
    }

    #[test]
    fn test_reply_never_precedes_its_comment() {
        let session = session();
        session.push_comment(top("a"));
        session.push_reply(0, Comment::reply("fast reply")).unwrap();

        let mut cursor = DeltaCursor::new();
        let events = session.with_state(|s| cursor.advance(s));
        assert_eq!(texts(&events), ["c0:a", "r0:fast reply"]);
    }

    #[test]
    fn test_done_once_after_drain() {
        let session = session();
        let mut cursor = DeltaCursor::new();
        session.push_comment(top("a"));
        session.mark_complete();

        let events = session.with_state(|s| cursor.advance(s));
        assert_eq!(texts(&events), ["c0:a", "done"]);
        assert!(cursor.is_done());
        assert!(session.with_state(|s| cursor.advance(s)).is_empty());
    }

    #[test]
    fn test_failed_selection_yields_only_done() {
        let session = session();
        session.record_failure(GenerationError::EmptyResponse);
        session.mark_complete();

        let mut cursor = DeltaCursor::new();
        let events = session.with_state(|s| cursor.advance(s));
        assert_eq!(events, [DeltaEvent::Done]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_follows_concurrent_writer() {
        let session = session();
        let writer = Arc::clone(&session);
        tokio::spawn(async move {
            for i in 0..3 {
                tokio::time::sleep(Duration::from_millis(120)).await;
                writer.push_comment(top(&format!("t{i}")));
            }
            for i in (0..3).rev() {
                tokio::time::sleep(Duration::from_millis(70)).await;
                writer.push_reply(i, Comment::reply(format!("re{i}"))).unwrap();
            }
            writer.mark_complete();
        });

        let events: Vec<_> = DeltaStreamer::new(session, config(500))
            .into_stream()
            .collect()
            .await;

        assert_well_ordered(&events);
        assert_eq!(
            texts(&events),
            ["c0:t0", "c1:t1", "c2:t2", "r2:re2", "r1:re1", "r0:re0", "done"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_observers_do_not_consume_events() {
        let session = session();
        let early = DeltaStreamer::new(Arc::clone(&session), config(50)).into_stream();
        let early = tokio::spawn(early.collect::<Vec<_>>());

        session.set_stances(vec![]).unwrap();
        session.push_comment(top("a"));
        tokio::time::sleep(Duration::from_millis(200)).await;
        session.push_reply(0, Comment::reply("a1")).unwrap();
        session.push_comment(top("b"));
        session.mark_complete();

        let late: Vec<_> = DeltaStreamer::new(Arc::clone(&session), config(50))
            .into_stream()
            .collect()
            .await;
        let early = early.await.unwrap();

        assert_well_ordered(&early);
        assert_well_ordered(&late);
        assert_eq!(texts(&late), ["c0:a", "c1:b", "r0:a1", "done"]);

        let as_set = |events: &[DeltaEvent]| texts(events).into_iter().collect::<HashSet<_>>();
        assert_eq!(as_set(&early), as_set(&late));
        assert_eq!(early.len(), late.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_cuts_wait_short() {
        let session = session();
        let writer = Arc::clone(&session);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            writer.push_comment(top("early bird"));
        });

        let poll_interval = Duration::from_secs(3600);
        let mut streamer = DeltaStreamer::new(session, StreamerConfig { poll_interval });
        let started = Instant::now();
        let batch = streamer.next_batch().await;

        assert_eq!(texts(&batch), ["c0:early bird"]);
        assert!(started.elapsed() < poll_interval);
    }

    #[tokio::test]
    async fn test_forward_into_channel() {
        let session = session();
        session.push_comment(top("a"));
        session.push_reply(0, Comment::reply("a1")).unwrap();
        session.mark_complete();

        let (mut tx, rx) = mpsc::unbounded_channel();
        assert_ok!(DeltaStreamer::new(session, config(10)).forward(&mut tx).await);
        drop(tx);

        let events: Vec<_> = UnboundedReceiverStream::new(rx).collect().await;
        assert_eq!(texts(&events), ["c0:a", "r0:a1", "done"]);
    }

    #[tokio::test]
    async fn test_forward_stops_on_closed_sink() {
        let session = session();
        session.push_comment(top("a"));
        session.mark_complete();

        let (mut tx, rx) = mpsc::unbounded_channel::<DeltaEvent>();
        drop(rx);

        let result = DeltaStreamer::new(Arc::clone(&session), config(10))
            .forward(&mut tx)
            .await;
        assert!(matches!(assert_err!(result), SinkError::Closed));
        assert!(session.is_complete());
    }
}
