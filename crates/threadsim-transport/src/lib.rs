//! Transport layer for delta event streams.
//!
//! Provides:
//! - Wire protocol (JSON, one message per delta event)
//! - HTML rendering of comments
//! - WebSocket transport (feature: websocket)
//! - Server-Sent Events transport (feature: sse)

pub mod protocol;
pub mod render;

#[cfg(any(feature = "websocket", feature = "sse"))]
pub mod lookup;

#[cfg(feature = "websocket")]
pub mod websocket;

#[cfg(feature = "sse")]
pub mod sse;

pub use protocol::ServerMessage;
pub use render::render_comment;
