//! # Domain Entities
//!
//! The shipment record stored on the ledger and the contract's deployment
//! metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// STATUS CONVENTIONS
// =============================================================================

/// Canonical shipment status values.
///
/// These are conventions shared with client applications. The contract
/// accepts any non-empty status string on update.
pub mod status {
    /// Set by `CreateShipment`.
    pub const CREATED: &str = "CREATED";
    /// Goods collected from the origin.
    pub const PICKED_UP: &str = "PICKED_UP";
    /// Goods moving between custodians.
    pub const IN_TRANSIT: &str = "IN_TRANSIT";
    /// Goods handed over at the destination.
    pub const DELIVERED: &str = "DELIVERED";
    /// Something went wrong in transit.
    pub const EXCEPTION: &str = "EXCEPTION";

    /// All canonical values, in lifecycle order.
    pub const CANONICAL: [&str; 5] = [CREATED, PICKED_UP, IN_TRANSIT, DELIVERED, EXCEPTION];

    /// Returns true if `value` is one of the canonical statuses.
    #[must_use]
    pub fn is_canonical(value: &str) -> bool {
        CANONICAL.contains(&value)
    }
}

// =============================================================================
// SHIPMENT
// =============================================================================

/// A shipment record, keyed on the ledger by its `id`.
///
/// `id`, `origin` and `destination` never change after creation.
/// `owner_msp` is the current custodian and is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    /// Unique ledger key.
    pub id: String,
    /// MSP of the current custodian.
    pub owner_msp: String,
    /// Free-form origin location.
    pub origin: String,
    /// Free-form destination location.
    pub destination: String,
    /// Open-ended, non-empty status string.
    pub status: String,
    /// Timestamp of the last mutation (RFC 3339 on the wire).
    pub last_update: DateTime<Utc>,
    /// Reference hash of off-ledger documents. Empty when none are attached.
    #[serde(default)]
    pub docs_hash: String,
}

impl Shipment {
    /// Build a freshly created shipment owned by `owner_msp`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        owner_msp: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            owner_msp: owner_msp.into(),
            origin: origin.into(),
            destination: destination.into(),
            status: status::CREATED.to_string(),
            last_update: created_at,
            docs_hash: String::new(),
        }
    }

    /// Set a new status and hand custody to `custodian`.
    pub fn record_status(&mut self, new_status: &str, custodian: &str, at: DateTime<Utc>) {
        self.status = new_status.to_string();
        self.owner_msp = custodian.to_string();
        self.last_update = at;
    }

    /// Hand custody to `new_owner` without touching the status.
    pub fn transfer_to(&mut self, new_owner: &str, at: DateTime<Utc>) {
        self.owner_msp = new_owner.to_string();
        self.last_update = at;
    }

    /// Returns true if `msp` is the current custodian.
    #[must_use]
    pub fn is_owned_by(&self, msp: &str) -> bool {
        self.owner_msp == msp
    }
}

// =============================================================================
// CONTRACT METADATA
// =============================================================================

/// Metadata published with the deployed contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    /// Display title.
    pub title: String,
    /// Deployed version.
    pub version: String,
    /// Human-readable description.
    pub description: String,
}

impl Default for ContractInfo {
    fn default() -> Self {
        Self {
            title: "ShippingContract".to_string(),
            version: "1.0".to_string(),
            description: "Proof-of-concept supply-chain chain-code".to_string(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
