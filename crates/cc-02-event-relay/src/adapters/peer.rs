//! # Peer Gateway
//!
//! Connects to a ledger peer's event endpoint over WebSocket.
//!
//! ## Wire protocol
//!
//! 1. `connect`: open `{ws|wss}://{peer}/events`, presenting the MSP id and
//!    leaf certificate as `x-msp-id` / `x-client-cert` headers. `wss` runs
//!    over rustls with the configured CA and the identity as client
//!    certificate.
//! 2. `subscribe`: send `{"type":"subscribe","channel":..,"contract":..}`.
//! 3. The peer then streams one JSON [`LedgerEvent`] per text frame.
//!
//! A background pump forwards decoded frames into a bounded channel until the
//! subscription token fires or the peer closes the socket.
//!
//! ## Deployment
//!
//! Ledger peers do not speak this protocol natively; they publish block events
//! over the gateway's gRPC stream. `PEER_ENDPOINT` must name an event bridge
//! in front of the peer that re-emits its contract events as described above.
//! Pointing it at a peer's gRPC port fails the WebSocket handshake at startup.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use rustls::ClientConfig;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{Connector, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::channel::{ChannelEvents, FeedItem};
use super::identity::ClientIdentity;
use crate::config::RelayConfig;
use crate::domain::LedgerEvent;
use crate::errors::RelayError;
use crate::ports::outbound::{ConnectionGateway, GatewaySession, SubscriptionScope};

type PeerSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Capacity of the frame channel between the pump and the relay.
const EVENT_BUFFER: usize = 256;

/// Gateway to a ledger peer.
#[derive(Debug)]
pub struct PeerGateway {
    url: String,
    msp_id: String,
    cert_header: String,
    tls: Arc<ClientConfig>,
}

impl PeerGateway {
    /// Load identity and TLS material named by `config`.
    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        let identity = ClientIdentity::load(&config.msp_id, &config.cert_path, &config.key_path)?;
        let tls = identity.tls_config(&config.tls_ca_path)?;

        Ok(Self {
            url: events_url(&config.peer_endpoint),
            msp_id: identity.msp_id().to_string(),
            cert_header: identity.certificate_header(),
            tls,
        })
    }

    /// Event endpoint this gateway connects to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ConnectionGateway for PeerGateway {
    type Session = PeerSession;

    async fn connect(&self) -> Result<Self::Session, RelayError> {
        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| RelayError::Fatal(format!("invalid peer endpoint {}: {e}", self.url)))?;

        let headers = request.headers_mut();
        headers.insert("x-msp-id", header_value(&self.msp_id)?);
        headers.insert("x-client-cert", header_value(&self.cert_header)?);

        let connector = Connector::Rustls(Arc::clone(&self.tls));
        let (socket, response) =
            tokio_tungstenite::connect_async_tls_with_config(request, None, false, Some(connector))
                .await
                .map_err(|e| RelayError::Transient(format!("failed to connect to {}: {e}", self.url)))?;

        info!(url = %self.url, msp_id = %self.msp_id, status = %response.status(), "Connected to ledger peer");
        Ok(PeerSession::new(socket))
    }
}

#[derive(Serialize)]
struct SubscribeRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    channel: &'a str,
    contract: &'a str,
}

enum SessionState {
    Connected(PeerSocket),
    Subscribed {
        sink: SplitSink<PeerSocket, Message>,
        pump: JoinHandle<()>,
    },
    Closed,
}

/// Open connection to a ledger peer.
pub struct PeerSession {
    state: SessionState,
}

impl std::fmt::Debug for PeerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            SessionState::Connected(_) => "connected",
            SessionState::Subscribed { .. } => "subscribed",
            SessionState::Closed => "closed",
        };
        f.debug_struct("PeerSession").field("state", &state).finish()
    }
}

impl PeerSession {
    fn new(socket: PeerSocket) -> Self {
        Self {
            state: SessionState::Connected(socket),
        }
    }
}

#[async_trait]
impl GatewaySession for PeerSession {
    type Events = ChannelEvents;

    async fn subscribe(
        &mut self,
        scope: &SubscriptionScope,
        cancel: CancellationToken,
    ) -> Result<Self::Events, RelayError> {
        let mut socket = match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Connected(socket) => socket,
            other => {
                self.state = other;
                return Err(RelayError::Transient("session already subscribed or closed".into()));
            }
        };

        let request = serde_json::to_string(&SubscribeRequest {
            kind: "subscribe",
            channel: &scope.channel,
            contract: &scope.contract,
        })
        .map_err(|e| RelayError::Fatal(e.to_string()))?;

        socket
            .send(Message::Text(request))
            .await
            .map_err(|e| RelayError::Transient(format!("subscribe request failed: {e}")))?;

        let (sink, stream) = socket.split();
        let (sender, receiver) = mpsc::channel(EVENT_BUFFER);
        let pump = tokio::spawn(pump_frames(stream, sender, cancel.clone()));

        debug!(channel = %scope.channel, contract = %scope.contract, "Peer subscription opened");
        self.state = SessionState::Subscribed { sink, pump };
        Ok(ChannelEvents::new(receiver, cancel))
    }

    async fn close(&mut self) {
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Connected(mut socket) => {
                let _ = socket.close(None).await;
            }
            SessionState::Subscribed { mut sink, pump } => {
                pump.abort();
                let _ = sink.send(Message::Close(None)).await;
                let _ = sink.close().await;
            }
            SessionState::Closed => {}
        }
        debug!("Peer session closed");
    }
}

/// Forward peer frames into `sender` until cancelled or the socket ends.
async fn pump_frames(
    mut stream: SplitStream<PeerSocket>,
    sender: mpsc::Sender<FeedItem>,
    cancel: CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            frame = stream.next() => frame,
        };

        let item = match frame {
            None | Some(Ok(Message::Close(_))) => break,
            Some(Err(e)) => {
                warn!(error = %e, "Peer event stream failed");
                break;
            }
            Some(Ok(Message::Text(text))) => decode_frame(text.as_bytes()),
            Some(Ok(Message::Binary(bytes))) => decode_frame(&bytes),
            Some(Ok(_)) => continue,
        };

        if sender.send(item).await.is_err() {
            break;
        }
    }
    debug!("Peer frame pump stopped");
}

fn decode_frame(bytes: &[u8]) -> FeedItem {
    serde_json::from_slice::<LedgerEvent>(bytes).map_err(|e| RelayError::Corrupt(e.to_string()))
}

fn header_value(value: &str) -> Result<HeaderValue, RelayError> {
    HeaderValue::from_str(value).map_err(|e| RelayError::Fatal(format!("invalid header value: {e}")))
}

/// Event endpoint URL for `endpoint`.
///
/// A bare `host:port` defaults to `wss`.
fn events_url(endpoint: &str) -> String {
    let base = endpoint.trim_end_matches('/');
    if base.starts_with("ws://") || base.starts_with("wss://") {
        format!("{base}/events")
    } else {
        format!("wss://{base}/events")
    }
}
