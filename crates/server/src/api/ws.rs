//! WebSocket support for live-updating clients.
//!
//! Clients subscribe here and receive every [`ChangeEvent`] as a JSON
//! text frame: sync progress, catalog swaps and metadata mutations. A
//! consumer re-runs its queries when an event touches a version it
//! depends on.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use brewdex_core::ChangeEvent;

use crate::metrics::{
    WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_LAG_EVENTS, WS_MESSAGES_SENT,
};
use crate::state::AppState;

/// GET /api/v1/ws
pub async fn ws_handler(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let rx = state.hub().subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, rx))
}

async fn handle_socket(mut socket: WebSocket, mut rx: broadcast::Receiver<ChangeEvent>) {
    WS_CONNECTIONS_TOTAL.inc();
    WS_CONNECTIONS_ACTIVE.inc();
    debug!("WebSocket client connected");

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!("Failed to serialize change event: {}", e);
                            continue;
                        }
                    };
                    if socket.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                    WS_MESSAGES_SENT.inc();
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    WS_LAG_EVENTS.inc();
                    warn!("WebSocket subscriber lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            msg = socket.recv() => match msg {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {} // Clients only listen; ignore anything sent.
                Some(Err(_)) => break,
            },
        }
    }

    WS_CONNECTIONS_ACTIVE.dec();
    debug!("WebSocket client disconnected");
}
