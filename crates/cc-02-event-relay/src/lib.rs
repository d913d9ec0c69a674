//! # Event Relay (cc-02)
//!
//! Bridges a ledger event subscription to live WebSocket subscribers.
//!
//! ```text
//! Ledger peer ──events──→ RelayService ──envelope──→ ClientHub ──→ subscriber queues
//!                               │                                     │
//!                       CancellationToken                      /ws writer tasks
//! ```
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - `LedgerEvent`, `EventEnvelope`, `RelayState`, counters
//! - `ports/` - `ConnectionGateway`, `GatewaySession`, `EventSource`
//! - `hub.rs` - concurrent subscriber registry with non-blocking broadcast
//! - `service.rs` - relay lifecycle state machine
//! - `adapters/` - peer (WebSocket + TLS) and in-memory gateways
//! - `server.rs` - axum `/ws` and `/health` endpoints
//! - `config.rs` - environment configuration
//!
//! ## Usage
//!
//! ```ignore
//! let hub = Arc::new(ClientHub::new());
//! let relay = RelayService::new(Arc::clone(&hub), config.scope());
//! let gateway = PeerGateway::from_config(&config)?;
//! relay.run(&gateway, shutdown).await?;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod hub;
pub mod ports;
pub mod server;
pub mod service;

pub use adapters::{ClientIdentity, EventFeed, InMemoryGateway, PeerGateway};
pub use config::RelayConfig;
pub use domain::{EventEnvelope, LedgerEvent, RelayOutcome, RelayState, RelayStats};
pub use errors::{ConfigError, RelayError};
pub use hub::{BroadcastReport, ClientHub, ConnectionId, HubMessage, SubscriberHandle};
pub use ports::{ConnectionGateway, EventSource, GatewaySession, SubscriptionScope};
pub use server::{HealthResponse, ServerState};
pub use service::RelayService;

/// Subsystem identifier used in log targets and metadata.
pub const SUBSYSTEM_ID: u8 = 2;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
