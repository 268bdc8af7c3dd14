//! Session lookup shared by the HTTP transports.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use threadsim_core::{DeltaStreamer, SessionId};
use threadsim_session::SessionManager;
use uuid::Uuid;

/// `?id=` query parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionQuery {
    pub id: Option<String>,
}

/// Session lookup error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Missing session ID")]
    MissingId,
    #[error("Invalid session ID")]
    InvalidId,
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingId => StatusCode::BAD_REQUEST,
            Self::InvalidId => StatusCode::NOT_FOUND,
        };
        (status, self.to_string()).into_response()
    }
}

/// Parse the raw `id` parameter.
///
/// # Errors
/// Returns error if the parameter is absent, empty, or not an identifier.
pub fn parse_session_id(raw: Option<&str>) -> Result<SessionId, LookupError> {
    let raw = raw.filter(|s| !s.is_empty()).ok_or(LookupError::MissingId)?;
    Uuid::parse_str(raw).map_err(|_| LookupError::InvalidId)
}

/// Attach an observer to the session named by `raw`.
///
/// # Errors
/// Returns error if the parameter is absent or names no session.
pub fn watch_session(
    manager: &SessionManager,
    raw: Option<&str>,
) -> Result<DeltaStreamer, LookupError> {
    let id = parse_session_id(raw)?;
    manager.watch(id).map_err(|_| LookupError::InvalidId)
}
