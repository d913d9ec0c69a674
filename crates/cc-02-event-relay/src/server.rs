//! # Subscriber Endpoint
//!
//! `GET /ws` upgrades to a WebSocket and registers the connection with the
//! [`ClientHub`]. `GET /health` reports relay state and subscriber count.
//!
//! Each connection runs two tasks:
//! - writer: drains the subscriber queue into text frames
//! - reader: discards inbound frames and notices disconnection
//!
//! When either side ends the connection is removed from the hub.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use crate::domain::RelayState;
use crate::errors::RelayError;
use crate::hub::{ClientHub, SubscriberHandle};

/// State shared by the HTTP handlers.
#[derive(Debug, Clone)]
pub struct ServerState {
    hub: Arc<ClientHub>,
    relay_state: watch::Receiver<RelayState>,
    subscriber_buffer: usize,
}

impl ServerState {
    /// Handler state over `hub`, reporting `relay_state` on `/health`.
    pub fn new(
        hub: Arc<ClientHub>,
        relay_state: watch::Receiver<RelayState>,
        subscriber_buffer: usize,
    ) -> Self {
        Self {
            hub,
            relay_state,
            subscriber_buffer,
        }
    }
}

/// `/health` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: &'static str,
    /// Current relay lifecycle state.
    pub relay_state: RelayState,
    /// Registered subscriber count.
    pub subscribers: usize,
}

/// Build the subscriber router.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind the subscriber listener. Failure is fatal.
pub async fn bind(addr: &str) -> Result<TcpListener, RelayError> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| RelayError::Fatal(format!("failed to bind {addr}: {e}")))
}

/// Serve subscribers on `listener` until the task is aborted.
pub async fn serve(listener: TcpListener, state: ServerState) -> Result<(), RelayError> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "WebSocket server listening");
    }
    axum::serve(listener, router(state))
        .await
        .map_err(|e| RelayError::Fatal(format!("subscriber endpoint failed: {e}")))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<ServerState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let relay_state = *state.relay_state.borrow();
    Json(HealthResponse {
        status: "ok",
        relay_state,
        subscribers: state.hub.len(),
    })
}

async fn handle_socket(socket: WebSocket, state: ServerState) {
    let (handle, queue) = SubscriberHandle::channel(state.subscriber_buffer);
    let id = handle.id();
    state.hub.add(handle);
    info!(connection = %id, subscribers = state.hub.len(), "Client connected");

    let (mut sink, mut inbound) = socket.split();

    let mut writer = tokio::spawn(async move {
        let mut queue = ReceiverStream::new(queue);
        while let Some(message) = queue.next().await {
            if sink.send(Message::Text(message.to_string())).await.is_err() {
                break;
            }
        }
    });

    // Inbound application frames are ignored.
    loop {
        tokio::select! {
            frame = inbound.next() => match frame {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
                Some(Ok(_)) => debug!(connection = %id, "Ignoring inbound frame"),
            },
            _ = &mut writer => break,
        }
    }

    state.hub.remove(id);
    writer.abort();
    info!(connection = %id, subscribers = state.hub.len(), "Client disconnected");
}
