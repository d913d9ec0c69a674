//! # Outbound Ports (Driven Ports)
//!
//! What the shipment contract needs from the hosting ledger platform.
//!
//! Production: the platform's chain-code shim.
//! Testing: `InMemoryLedger` (see `adapters::memory_ledger`).

use chrono::{DateTime, Utc};

use crate::errors::LedgerError;

/// Per-invocation view of the ledger.
///
/// One context exists for exactly one transaction. Writes made through
/// `put_state` are staged and only become visible once the platform commits
/// the invocation; reads observe committed world state.
pub trait TransactionContext {
    /// MSP identity of the organization invoking the transaction.
    fn caller_msp(&self) -> Result<String, LedgerError>;

    /// Platform-assigned transaction id.
    fn tx_id(&self) -> &str;

    /// Timestamp proposed by the submitting client.
    ///
    /// Identical on every endorsing peer, so mutations stamp records with
    /// this value instead of the local clock.
    fn tx_timestamp(&self) -> DateTime<Utc>;

    /// Read the value stored under `key`. `Ok(None)` when absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Stage a write of `value` under `key`.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Scan keys in `[start, end)` in key order.
    ///
    /// Empty bounds are open: `("", "")` scans the whole namespace.
    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;
}
