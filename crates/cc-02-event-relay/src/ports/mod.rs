//! # Ports Layer (Hexagonal Architecture)
//!
//! - `outbound`: the ledger network connection the relay depends on

pub mod outbound;

pub use outbound::{ConnectionGateway, EventSource, GatewaySession, SubscriptionScope};
