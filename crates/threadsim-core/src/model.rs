//! Discussion data model.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Label attached to every reply.
pub const REPLY_LABEL: &str = "reply";

/// Handles that reply authors are drawn from.
pub const REPLY_AUTHORS: &[&str] = &[
    "ReplyMaster",
    "CuriousCat",
    "HonestAbe",
    "DebateKing",
    "FriendlyNeighbor",
    "JustSaying",
    "RandomUser",
    "WittyRemark",
    "SkepticalSam",
    "AgreeableAlex",
];

/// A perspective that guides one generated remark.
///
/// Identity is structural: two stances with the same kind and subkind
/// are the same stance, and a selection may contain duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stance {
    /// Broad family, e.g. `supportive`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Specific flavour within the family, e.g. `strong_agreement`.
    #[serde(rename = "subtype")]
    pub subkind: String,
    /// One-line description handed to the generator.
    pub summary: String,
}

impl Stance {
    /// Create a new stance.
    #[must_use]
    pub fn new(
        kind: impl Into<String>,
        subkind: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            subkind: subkind.into(),
            summary: summary.into(),
        }
    }

    /// Author handle used for remarks written from this stance.
    #[must_use]
    pub fn handle(&self) -> String {
        format!("{}_{}", self.kind, self.subkind)
    }
}

/// A single generated remark.
///
/// Created once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub label: String,
    pub text: String,
}

impl Comment {
    /// Create a comment.
    #[must_use]
    pub fn new(
        author: impl Into<String>,
        label: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            label: label.into(),
            text: text.into(),
        }
    }

    /// Top-level remark written from `stance`.
    #[must_use]
    pub fn from_stance(stance: &Stance, text: impl Into<String>) -> Self {
        Self::new(stance.handle(), stance.kind.clone(), text)
    }

    /// Reply by a randomly chosen author.
    #[must_use]
    pub fn reply(text: impl Into<String>) -> Self {
        let author = REPLY_AUTHORS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("RandomUser");
        Self::new(author, REPLY_LABEL, text)
    }
}

/// A top-level remark together with its replies.
///
/// The orchestrator never nests deeper than one reply level, so the
/// tree is modelled as exactly two levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub comment: Comment,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Thread {
    /// Start a thread with no replies.
    #[must_use]
    pub const fn new(comment: Comment) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }
}
