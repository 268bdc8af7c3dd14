//! Session orchestration and storage for simulated discussion threads.
//!
//! Provides:
//! - `SessionStore` - In-memory directory of live sessions
//! - `Orchestrator` - Drives a session from empty to complete
//! - `SessionManager` - Submission, lookup, and observation entry points

pub mod manager;
pub mod orchestrator;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use manager::{ManagerError, SessionManager};
pub use orchestrator::Orchestrator;
pub use store::SessionStore;
