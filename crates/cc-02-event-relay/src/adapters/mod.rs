//! # Adapters Module
//!
//! - `channel`: mpsc-backed event stream shared by both gateways
//! - `identity`: MSP identity and TLS client configuration
//! - `in_memory`: in-process gateway for tests and local runs
//! - `peer`: WebSocket/TLS gateway to a ledger peer

pub mod channel;
pub mod identity;
pub mod in_memory;
pub mod peer;

pub use channel::ChannelEvents;
pub use identity::ClientIdentity;
pub use in_memory::{EventFeed, InMemoryGateway, InMemorySession};
pub use peer::{PeerGateway, PeerSession};
