//! # Outbound Ports (Driven Ports)
//!
//! What the relay needs from the ledger network.
//!
//! Production: `PeerGateway` (WebSocket + TLS to a ledger peer).
//! Testing: `InMemoryGateway`.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::LedgerEvent;
use crate::errors::RelayError;

/// Channel and contract an event subscription is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionScope {
    /// Ledger channel name.
    pub channel: String,
    /// Contract name on that channel.
    pub contract: String,
}

impl SubscriptionScope {
    /// Scope for `contract` on `channel`.
    pub fn new(channel: impl Into<String>, contract: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            contract: contract.into(),
        }
    }
}

/// Authenticates an identity and opens a session with the ledger network.
#[async_trait]
pub trait ConnectionGateway: Send + Sync {
    /// Session type produced by [`connect`](Self::connect).
    type Session: GatewaySession;

    /// Open a session. Any error here is fatal for the relay.
    async fn connect(&self) -> Result<Self::Session, RelayError>;
}

/// An open session with the ledger network.
#[async_trait]
pub trait GatewaySession: Send {
    /// Event stream type produced by [`subscribe`](Self::subscribe).
    type Events: EventSource;

    /// Subscribe to contract events in `scope`.
    ///
    /// The stream ends once `cancel` fires.
    async fn subscribe(
        &mut self,
        scope: &SubscriptionScope,
        cancel: CancellationToken,
    ) -> Result<Self::Events, RelayError>;

    /// Release the session.
    async fn close(&mut self);
}

/// Ordered stream of ledger events.
#[async_trait]
pub trait EventSource: Send {
    /// Next event, `Some(Err(_))` for one undecodable item, `None` once
    /// the delivery channel has closed.
    async fn next_event(&mut self) -> Option<Result<LedgerEvent, RelayError>>;
}
