//! # Domain Layer
//!
//! Event types and relay lifecycle. No I/O.

pub mod envelope;
pub mod state;

pub use envelope::{EventEnvelope, LedgerEvent};
pub use state::{RelayOutcome, RelayState, RelayStats};
