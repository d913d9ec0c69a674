//! # Ports Layer (Hexagonal Architecture)
//!
//! - `inbound`: the transaction functions the contract exports
//! - `outbound`: the ledger context the contract runs against

pub mod inbound;
pub mod outbound;

pub use inbound::ShipmentContractApi;
pub use outbound::TransactionContext;
