//! Wire protocol for delta events.

use serde::{Deserialize, Serialize};
use threadsim_core::DeltaEvent;

use crate::render::render_comment;

/// Message from server to observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// New top-level comment.
    Comment {
        #[serde(rename = "parentIndex")]
        parent_index: usize,
        html: String,
    },
    /// New reply under `parent_index`.
    Reply {
        #[serde(rename = "parentIndex")]
        parent_index: usize,
        html: String,
    },
    /// Stream finished.
    Done,
}

impl ServerMessage {
    /// Render a delta event for the wire.
    #[must_use]
    pub fn from_event(event: &DeltaEvent) -> Self {
        match event {
            DeltaEvent::Comment {
                parent_index,
                comment,
            } => Self::Comment {
                parent_index: *parent_index,
                html: render_comment(comment, 0),
            },
            DeltaEvent::Reply {
                parent_index,
                reply,
            } => Self::Reply {
                parent_index: *parent_index,
                html: render_comment(reply, 1),
            },
            DeltaEvent::Done => Self::Done,
        }
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl From<&DeltaEvent> for ServerMessage {
    fn from(event: &DeltaEvent) -> Self {
        Self::from_event(event)
    }
}
