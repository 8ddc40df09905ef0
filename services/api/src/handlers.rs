//! Axum Handlers for the REST API
//!
//! Read-only inspection of the live sessions held in memory.
//! It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::{
    models::{ErrorResponse, SessionList, SessionSnapshot},
    state::AppState,
};

pub enum ApiError {
    NotFound(String),
    /// The session is mid-turn and holds its lock.
    Busy(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                warn!("{}", message);
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
            ApiError::Busy(message) => {
                warn!("{}", message);
                (StatusCode::CONFLICT, Json(ErrorResponse { message })).into_response()
            }
        }
    }
}

/// List the ids of all live sessions.
#[utoipa::path(
    get,
    path = "/sessions",
    responses(
        (status = 200, description = "Live session ids", body = SessionList)
    )
)]
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<SessionList> {
    let session_ids = state.registry.ids().await;
    Json(SessionList { session_ids })
}

/// Get a snapshot of a live session.
///
/// Never waits on a turn in flight: a session that is generating a reply
/// answers 409 and can be polled again.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    responses(
        (status = 200, description = "Session snapshot", body = SessionSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Session is generating a reply", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handle = state
        .registry
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session with id '{}' not found", id)))?;

    let session = handle
        .try_lock()
        .map_err(|_| ApiError::Busy(format!("Session with id '{}' is busy", id)))?;
    let snapshot = SessionSnapshot::capture(id, &session);
    Ok((StatusCode::OK, Json(snapshot)))
}
