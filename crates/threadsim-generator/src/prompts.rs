//! Prompt texts for the three generation calls.

use serde_json::{Value, json};
use threadsim_core::Stance;

/// Fewest stances a selection may contain.
pub const MIN_STANCES: usize = 5;

/// Most stances a selection may contain.
pub const MAX_STANCES: usize = 8;

/// Name of the function the model must call when selecting stances.
pub const SELECT_STANCES_FUNCTION: &str = "select_stances";

/// Role-establishing context plus task-specific context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Prompt asking the model to pick stances from `catalog_json`.
#[must_use]
pub fn stance_selection(category: &str, post: &str, catalog_json: &str) -> Prompt {
    Prompt {
        system: format!(
            "You are helping choose a set of stances for a discussion thread.\n\
             Select {MIN_STANCES} to {MAX_STANCES} stances from a given list of predefined options. \
             Choose perspectives that would likely be given. Do not invent new stances.\n\
             Use only stances from the provided list. It is ok if stances are repeated."
        ),
        user: format!(
            "Thread category: {category}\n\
             Post content: {post}\n\n\
             Here is the full list of allowed stances (with type, subtype, and summary):\n\
             {catalog_json}"
        ),
    }
}

/// Prompt for one top-level remark written from `stance`.
#[must_use]
pub fn comment(post: &str, stance: &Stance) -> Prompt {
    Prompt {
        system: format!(
            "You are a forum commenter who holds the following stance:\n\
             Type: {}\n\
             SubType: {}\n\
             Summary: {}\n\n\
             Write a single comment responding to the user's post from this perspective.\n\
             Your response should sound like a typical forum user with that viewpoint.",
            stance.kind, stance.subkind, stance.summary
        ),
        user: format!("Here is the post:\n{post}"),
    }
}

/// Prompt for one reply to `parent`.
#[must_use]
pub fn reply(post: &str, parent: &str) -> Prompt {
    Prompt {
        system: "You are simulating a reply in a discussion thread. \
                 You have the original post and a parent comment. \
                 Write a single reply as if you are another forum user. \
                 Keep it natural and typical of online discussions."
            .to_string(),
        user: format!(
            "ORIGINAL POST:\n{post}\n\n\
             PARENT COMMENT:\n{parent}\n\n\
             Please write a single short reply to the parent comment."
        ),
    }
}

/// JSON schema for the stance selection function's arguments.
#[must_use]
pub fn stance_selection_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "stances": {
                "type": "array",
                "minItems": MIN_STANCES,
                "maxItems": MAX_STANCES,
                "items": {
                    "type": "object",
                    "properties": {
                        "type": { "type": "string" },
                        "subtype": { "type": "string" },
                        "summary": { "type": "string" }
                    },
                    "required": ["type", "subtype", "summary"]
                }
            }
        },
        "required": ["stances"]
    })
}
