//! Text generation for simulated discussion threads.
//!
//! Provides:
//! - Prompt texts for stance selection, remarks, and replies
//! - `OpenAiGenerator` - `TextGenerator` over the Chat Completions API

pub mod openai;
pub mod prompts;

pub use openai::{OpenAiConfig, OpenAiGenerator};
pub use prompts::{MAX_STANCES, MIN_STANCES, Prompt};
