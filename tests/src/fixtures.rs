//! Shared fixtures for the integration flows and benchmarks.

use cc_01_shipment_contract::CommittedTransaction;
use cc_02_event_relay::LedgerEvent;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Manufacturer organization.
pub const MANUFACTURER: &str = "ManufacturerMSP";
/// Carrier organization.
pub const CARRIER: &str = "CarrierMSP";
/// Retailer organization.
pub const RETAILER: &str = "RetailerMSP";

/// Deterministic transaction clock: `minutes` after a fixed epoch.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0)
        .single()
        .unwrap_or_default()
        + Duration::minutes(minutes)
}

/// One contract event per key written by a committed transaction.
///
/// The event is named after the invoked function and carries the written
/// value as its payload, which is how the peer reports state changes.
pub fn ledger_events(commit: &CommittedTransaction) -> Vec<LedgerEvent> {
    commit
        .writes
        .iter()
        .map(|(_, value)| LedgerEvent {
            transaction_id: commit.tx_id.clone(),
            event_name: commit.function.clone(),
            payload: value.clone(),
            block_number: commit.block_number,
        })
        .collect()
}

/// Synthetic event for relay-only flows.
pub fn block_event(block: u64) -> LedgerEvent {
    LedgerEvent {
        transaction_id: format!("tx-{block}"),
        event_name: "BlockCommitted".to_string(),
        payload: format!("{{\"block\":{block}}}").into_bytes(),
        block_number: block,
    }
}
