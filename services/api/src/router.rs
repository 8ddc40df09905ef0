//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST inspection API, WebSocket endpoint, and OpenAPI documentation.

use crate::{
    handlers,
    models::{ConversationMode, ErrorResponse, Message, MessageRole, SessionList, SessionSnapshot},
    state::AppState,
    ws::ws_handler,
};

use axum::{Router, routing::get};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_sessions,
        handlers::get_session,
    ),
    components(
        schemas(SessionSnapshot, SessionList, Message, MessageRole, ConversationMode, ErrorResponse)
    ),
    tags(
        (name = "Banter API", description = "Live conversation sessions")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/sessions", get(handlers::list_sessions))
        .route("/sessions/{id}", get(handlers::get_session))
        .route("/ws", get(ws_handler))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
