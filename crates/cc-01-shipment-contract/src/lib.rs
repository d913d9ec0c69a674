//! # Shipment Contract (cc-01)
//!
//! Role-gated custody state machine over ledger key/value state. The hosting
//! ledger platform invokes one exported function per transaction; each
//! invocation either commits all of its writes or none of them.
//!
//! ## Lifecycle
//!
//! ```text
//! CreateShipment (manufacturer) ──→ CREATED
//!                                      │
//!        UpdateStatus (any MSP) ───────┤  status := new, owner := caller
//!   TransferOwnership (owner only) ────┘  owner := new owner
//! ```
//!
//! Records are never deleted.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Shipment entity, status conventions, contract metadata
//! - `ports/` - `ShipmentContractApi` (inbound), `TransactionContext` (outbound)
//! - `service.rs` - `ShipmentContract` and the string-routed `invoke` surface
//! - `adapters/` - `InMemoryLedger` mock platform
//!
//! ## Usage
//!
//! ```ignore
//! use cc_01_shipment_contract::{InMemoryLedger, ShipmentContract};
//!
//! let contract = ShipmentContract::default();
//! let mut ledger = InMemoryLedger::new();
//! let resp = ledger.mock_invoke(
//!     &contract, "tx-1", "ManufacturerMSP", now,
//!     "CreateShipment", &["SHIP1", "Warsaw", "Berlin"],
//! );
//! assert!(resp.is_ok());
//! ```

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

pub use adapters::{CommittedTransaction, InMemoryLedger, MockTransaction, Response};
pub use domain::{status, ContractInfo, Shipment};
pub use errors::{ContractError, ErrorKind, LedgerError};
pub use ports::{ShipmentContractApi, TransactionContext};
pub use service::{functions, ContractConfig, ShipmentContract, DEFAULT_MANUFACTURER_MSP};

/// Subsystem identifier used in log targets and metadata.
pub const SUBSYSTEM_ID: u8 = 1;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
