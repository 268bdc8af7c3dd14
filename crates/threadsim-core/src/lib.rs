//! Core abstractions for simulated discussion threads.
//!
//! This crate provides the fundamental building blocks:
//! - `Session` - Shared, append-only thread state behind a per-session lock
//! - `DeltaStreamer` - Turns growing session state into ordered delta events
//! - `Stance`, `Comment`, `Thread` - The discussion data model
//! - `TextGenerator` and `EventSink` traits

pub mod catalog;
pub mod delta;
pub mod model;
pub mod session;
pub mod traits;

pub use catalog::catalog;
pub use delta::{DeltaCursor, DeltaEvent, DeltaStreamer, StreamerConfig};
pub use model::{Comment, Stance, Thread};
pub use session::{Session, SessionError, SessionId, SessionState, SessionView};
pub use traits::{EventSink, GenerationError, SinkError, TextGenerator};
