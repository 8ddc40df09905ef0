//! Manages the WebSocket connection lifecycle for a conversation session.

use super::{protocol::ServerMessage, turn::handle_text_frame};
use crate::state::AppState;
use anyhow::Result;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use banter_core::{SessionHandle, SessionId};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Main handler for an individual WebSocket connection.
///
/// Each connection owns one registry session for its lifetime. The session is
/// announced to the client, driven by the inbound frames, and removed from the
/// registry when the connection ends.
#[instrument(name = "ws_session", skip_all, fields(session_id, conn_id))]
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn_id: u32 = rand::random();
    tracing::Span::current().record("conn_id", conn_id);

    let (session_id, session) = state.registry.create().await;
    tracing::Span::current().record("session_id", &session_id.to_string());
    info!("New WebSocket connection.");

    let (mut socket_tx, socket_rx) = socket.split();

    if send_msg(&mut socket_tx, ServerMessage::SessionReady { session_id })
        .await
        .is_err()
    {
        error!("Failed to send SessionReady message to client.");
    } else if let Err(e) = run_session_loop(&mut socket_tx, socket_rx, session_id, &session).await {
        error!(error = ?e, "Session loop terminated with error.");
    }

    state.registry.remove(session_id).await;
    info!("WebSocket connection closed and session released.");
}

/// The receive loop for an established connection.
///
/// Frames are handled one at a time, so a session never sees two turns in
/// flight.
async fn run_session_loop(
    socket_tx: &mut SplitSink<WebSocket, Message>,
    mut socket_rx: SplitStream<WebSocket>,
    session_id: SessionId,
    session: &SessionHandle,
) -> Result<()> {
    while let Some(msg_result) = socket_rx.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                let reply = handle_text_frame(session, text.as_str()).await;
                send_msg(socket_tx, reply).await?;
            }
            Ok(Message::Binary(_)) => {
                warn!(%session_id, "Ignoring binary frame; audio is transcribed client-side.");
                send_msg(
                    socket_tx,
                    ServerMessage::Error {
                        message: "binary frames are not supported".to_string(),
                        retryable: false,
                    },
                )
                .await?;
            }
            Ok(Message::Close(_)) => {
                info!("Client sent close frame. Shutting down session.");
                break;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Err(e) => {
                error!("Error receiving from client WebSocket: {:?}", e);
                break;
            }
        }
    }
    Ok(())
}

/// A helper function to serialize and send a `ServerMessage` to the client.
pub(crate) async fn send_msg(
    socket_tx: &mut SplitSink<WebSocket, Message>,
    msg: ServerMessage,
) -> Result<()> {
    let serialized = serde_json::to_string(&msg)?;
    socket_tx.send(Message::Text(serialized.into())).await?;
    Ok(())
}
