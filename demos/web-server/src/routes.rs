//! HTTP routes for the front end and the JSON API.

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use threadsim_core::{SessionId, SessionView};
use threadsim_session::{ManagerError, SessionManager};
use threadsim_transport::lookup::{SessionQuery, parse_session_id};

const DEFAULT_CATEGORY: &str = "aita";

/// Submission from the form or the JSON API.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default, alias = "subreddit")]
    pub category: Option<String>,
}

impl StartRequest {
    fn category(&self) -> &str {
        self.category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
    }
}

struct AppError(ManagerError);

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            ManagerError::EmptyPrompt => StatusCode::BAD_REQUEST,
            ManagerError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, self.0.to_string()).into_response()
    }
}

/// Build the application router over a shared manager.
pub fn app(manager: Arc<SessionManager>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/new", get(new_handler))
        .route("/start", post(start_handler))
        .route("/session", get(session_handler))
        .route("/api/sessions", post(create_session_handler))
        .route("/api/sessions/{id}", get(get_session_handler))
        .with_state(Arc::clone(&manager))
        .merge(threadsim_transport::websocket::ws_router(Arc::clone(&manager)))
        .merge(threadsim_transport::sse::sse_router(manager))
}

async fn home_handler() -> Html<String> {
    Html(crate::pages::home())
}

async fn new_handler() -> Html<String> {
    Html(crate::pages::new_thread())
}

async fn start_handler(
    State(manager): State<Arc<SessionManager>>,
    Form(request): Form<StartRequest>,
) -> Result<Redirect, AppError> {
    let id = manager.start_session(&request.prompt, request.category())?;
    Ok(Redirect::to(&format!("/session?id={id}")))
}

async fn session_handler(
    State(manager): State<Arc<SessionManager>>,
    Query(query): Query<SessionQuery>,
) -> Response {
    let id = match parse_session_id(query.id.as_deref()) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    match manager.get_session(id) {
        Ok(session) => Html(crate::pages::session(session.id(), session.prompt())).into_response(),
        Err(e) => AppError(e).into_response(),
    }
}

async fn create_session_handler(
    State(manager): State<Arc<SessionManager>>,
    Json(request): Json<StartRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = manager.start_session(&request.prompt, request.category())?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn get_session_handler(
    State(manager): State<Arc<SessionManager>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(manager.get_session(id)?.view()))
}
