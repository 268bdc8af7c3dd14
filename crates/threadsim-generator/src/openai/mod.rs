//! OpenAI Chat Completions generator and wire types.

pub mod client;
pub mod protocol;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiConfig, OpenAiGenerator};
