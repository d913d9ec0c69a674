//! # Custody-Chain Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── hub_broadcast.rs  # Fan-out cost per subscriber count
//! └── src/
//!     ├── fixtures.rs       # Ledger → relay event conversion, clock
//!     └── integration/      # Cross-crate flows
//!         ├── contract_flows.rs
//!         ├── relay_flows.rs
//!         └── end_to_end.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cc-tests
//! cargo test -p cc-tests integration::end_to_end
//! cargo bench -p cc-tests
//! ```

pub mod fixtures;
pub mod integration;
