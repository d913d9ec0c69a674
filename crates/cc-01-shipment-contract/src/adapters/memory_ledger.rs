//! # In-Memory Ledger
//!
//! Mock ledger platform for tests and local tooling.
//!
//! World state lives in a `BTreeMap` so range scans come back in key order.
//! Each invocation gets a [`MockTransaction`] that reads committed state and
//! stages its own writes. Staged writes are committed as one block only when
//! the invocation succeeds.

use std::collections::BTreeMap;
use std::ops::Bound;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::LedgerError;
use crate::ports::outbound::TransactionContext;
use crate::service::ShipmentContract;

/// HTTP-style status for a successful invocation.
pub const STATUS_OK: u16 = 200;
/// HTTP-style status for a failed invocation.
pub const STATUS_ERROR: u16 = 500;

// =============================================================================
// COMMIT LOG
// =============================================================================

/// A transaction that made it onto the mock ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedTransaction {
    /// Platform transaction id.
    pub tx_id: String,
    /// Function that was invoked.
    pub function: String,
    /// Block the transaction was committed in.
    pub block_number: u64,
    /// Key/value pairs written, in write order.
    pub writes: Vec<(String, Vec<u8>)>,
}

/// Platform-style invocation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// [`STATUS_OK`] or [`STATUS_ERROR`].
    pub status: u16,
    /// Human-readable error message. Empty on success.
    pub message: String,
    /// Function return value.
    pub payload: Vec<u8>,
}

impl Response {
    /// Returns true for a 200 response.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

// =============================================================================
// LEDGER
// =============================================================================

/// In-memory world state plus commit log.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: BTreeMap<String, Vec<u8>>,
    log: Vec<CommittedTransaction>,
}

impl InMemoryLedger {
    /// Empty ledger at height zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed blocks.
    #[must_use]
    pub fn height(&self) -> u64 {
        self.log.len() as u64
    }

    /// Committed transactions, oldest first.
    #[must_use]
    pub fn commits(&self) -> &[CommittedTransaction] {
        &self.log
    }

    /// Committed value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.state.get(key).map(Vec::as_slice)
    }

    /// Write raw bytes straight into world state, bypassing the contract.
    pub fn put_raw(&mut self, key: &str, value: Vec<u8>) {
        self.state.insert(key.to_string(), value);
    }

    /// Open a transaction context for one invocation.
    #[must_use]
    pub fn begin<'l>(
        &'l self,
        tx_id: &str,
        caller_msp: &str,
        timestamp: DateTime<Utc>,
    ) -> MockTransaction<'l> {
        MockTransaction {
            ledger: self,
            tx_id: tx_id.to_string(),
            caller_msp: caller_msp.to_string(),
            timestamp,
            writes: Vec::new(),
        }
    }

    /// Apply staged writes as one block.
    ///
    /// Read-only invocations produce no block and return `None`.
    pub fn commit(
        &mut self,
        tx_id: &str,
        function: &str,
        writes: Vec<(String, Vec<u8>)>,
    ) -> Option<&CommittedTransaction> {
        if writes.is_empty() {
            return None;
        }

        for (key, value) in &writes {
            self.state.insert(key.clone(), value.clone());
        }

        let block_number = self.height() + 1;
        debug!(tx_id, function, block = block_number, writes = writes.len(), "Committed transaction");

        self.log.push(CommittedTransaction {
            tx_id: tx_id.to_string(),
            function: function.to_string(),
            block_number,
            writes,
        });
        self.log.last()
    }

    /// Run `function` against `contract` the way the platform would.
    ///
    /// Writes are committed on success and discarded on failure.
    pub fn mock_invoke(
        &mut self,
        contract: &ShipmentContract,
        tx_id: &str,
        caller_msp: &str,
        timestamp: DateTime<Utc>,
        function: &str,
        args: &[&str],
    ) -> Response {
        let mut tx = self.begin(tx_id, caller_msp, timestamp);
        let result = contract.invoke(&mut tx, function, args);
        let writes = tx.into_writes();

        match result {
            Ok(payload) => {
                self.commit(tx_id, function, writes);
                Response {
                    status: STATUS_OK,
                    message: String::new(),
                    payload,
                }
            }
            Err(e) => Response {
                status: STATUS_ERROR,
                message: e.to_string(),
                payload: Vec::new(),
            },
        }
    }
}

// =============================================================================
// TRANSACTION CONTEXT
// =============================================================================

/// One in-flight invocation against an [`InMemoryLedger`].
#[derive(Debug)]
pub struct MockTransaction<'l> {
    ledger: &'l InMemoryLedger,
    tx_id: String,
    caller_msp: String,
    timestamp: DateTime<Utc>,
    writes: Vec<(String, Vec<u8>)>,
}

impl MockTransaction<'_> {
    /// Consume the context and hand back its staged writes.
    #[must_use]
    pub fn into_writes(self) -> Vec<(String, Vec<u8>)> {
        self.writes
    }

    /// Writes staged so far.
    #[must_use]
    pub fn staged(&self) -> &[(String, Vec<u8>)] {
        &self.writes
    }
}

impl TransactionContext for MockTransaction<'_> {
    fn caller_msp(&self) -> Result<String, LedgerError> {
        if self.caller_msp.is_empty() {
            return Err(LedgerError::IdentityUnavailable("no client identity".into()));
        }
        Ok(self.caller_msp.clone())
    }

    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.ledger.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::WriteFailed {
                key: String::new(),
                reason: "empty key".into(),
            });
        }
        self.writes.push((key.to_string(), value));
        Ok(())
    }

    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start.to_string())
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end.to_string())
        };

        if let (Bound::Included(s), Bound::Excluded(e)) = (&lower, &upper) {
            if s > e {
                return Err(LedgerError::ScanFailed(format!("start {s} is after end {e}")));
            }
        }

        Ok(self
            .ledger
            .state
            .range((lower, upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================
