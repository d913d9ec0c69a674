//! # Event Envelope
//!
//! Raw ledger events and the JSON envelope subscribers receive.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::errors::RelayError;

/// One contract event as delivered by the ledger network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Id of the transaction that emitted the event.
    pub transaction_id: String,
    /// Contract-defined event name.
    pub event_name: String,
    /// Opaque event payload.
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
    /// Block the transaction was committed in.
    pub block_number: u64,
}

/// Outbound message for one ledger event.
///
/// Serialized as `{"txId", "eventName", "payload", "blockNumber"}` with the
/// payload base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    /// Originating transaction id.
    pub tx_id: String,
    /// Contract-defined event name.
    pub event_name: String,
    /// Opaque event payload.
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
    /// Block number.
    pub block_number: u64,
}

impl EventEnvelope {
    /// Serialize to the wire form sent to subscribers.
    pub fn to_json(&self) -> Result<String, RelayError> {
        serde_json::to_string(self).map_err(|e| RelayError::Corrupt(e.to_string()))
    }
}

impl From<LedgerEvent> for EventEnvelope {
    fn from(event: LedgerEvent) -> Self {
        Self {
            tx_id: event.transaction_id,
            event_name: event.event_name,
            payload: event.payload,
            block_number: event.block_number,
        }
    }
}

mod base64_bytes {
    use super::{Engine, STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
