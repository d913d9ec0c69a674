//! # Domain Layer (Inner Hexagon)
//!
//! Pure shipment types. No ledger access, no I/O.

pub mod entities;

pub use entities::{status, ContractInfo, Shipment};
