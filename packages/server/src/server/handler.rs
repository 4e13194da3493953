//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    relay::ConnectionId,
    wire::{Envelope, MessageKind},
};

use super::state::{AppState, ConnectQuery};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    let initial_name = query.username.unwrap_or_default();

    // Create the outbound channel for this client. Registration and history
    // replay happen together under the room lock, before the first frame is
    // read, so the newcomer misses nothing broadcast after this point.
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = {
        let mut room = state.room.lock().await;
        room.connect(tx, initial_name)
    };
    tracing::info!("Client '{}' connected and registered", connection_id);

    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id, rx))
}

/// Spawns the writer task: frames queued on the connection's channel are
/// pushed to the WebSocket sink. When a write fails the task ends, which
/// makes every later channel send to this connection fail.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let mut send_task = pusher_loop(rx, sender);

    // Read loop: decode inbound frames and drive the room. A decode failure
    // or transport error ends only this session.
    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let envelope = match serde_json::from_str::<Envelope>(&text) {
                        Ok(envelope) => envelope,
                        Err(e) => {
                            tracing::warn!(
                                "Malformed frame from '{}', closing session: {}",
                                connection_id,
                                e
                            );
                            break;
                        }
                    };
                    dispatch_frame(&state_clone, connection_id, envelope).await;
                }
                Message::Binary(_) => {
                    tracing::warn!(
                        "Binary frame from '{}', closing session",
                        connection_id
                    );
                    break;
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection_id);
                    break;
                }
                // Ping/pong is handled by the protocol layer
                _ => {}
            }
        }
    });

    // If either side of the session ends, tear down the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Remove and broadcast the new roster. The removal is idempotent: a
    // broadcast failure may already have taken this connection out.
    let removed = {
        let mut room = state.room.lock().await;
        room.disconnect(connection_id)
    };
    if removed {
        tracing::info!("Client '{}' disconnected", connection_id);
    }
}

/// Decode one inbound envelope into a room operation.
async fn dispatch_frame(state: &AppState, connection_id: ConnectionId, envelope: Envelope) {
    match envelope.kind {
        MessageKind::Username => {
            let mut room = state.room.lock().await;
            room.announce(connection_id, envelope.username);
        }
        MessageKind::Chat | MessageKind::Image | MessageKind::File => {
            tracing::debug!(
                "Received {:?} payload from '{}'",
                envelope.kind,
                connection_id
            );
            let mut room = state.room.lock().await;
            room.publish(connection_id, envelope);
        }
        // Clients never legitimately send a userlist; ignore it
        MessageKind::Userlist => {
            tracing::debug!("Ignoring inbound userlist from '{}'", connection_id);
        }
    }
}

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
