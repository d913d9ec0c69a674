//! # Error Types
//!
//! All error types surfaced by the shipment contract and its ledger port.

use thiserror::Error;

// =============================================================================
// ERROR TAXONOMY
// =============================================================================

/// Coarse classification shared by every error in the workspace.
///
/// Callers decide whether to retry or surface an error based on its kind,
/// never on its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Role or ownership check failed.
    PermissionDenied,
    /// Referenced record is absent.
    NotFound,
    /// Duplicate creation.
    AlreadyExists,
    /// Required field empty or malformed.
    InvalidArgument,
    /// Stored or received payload failed to decode.
    Corrupt,
    /// Network or connection failure; the caller may retry.
    Transient,
    /// Startup misconfiguration or unrecoverable resource failure.
    Fatal,
}

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors raised by the hosting ledger platform through the
/// [`TransactionContext`](crate::ports::outbound::TransactionContext) port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The caller's identity could not be resolved.
    #[error("caller identity unavailable: {0}")]
    IdentityUnavailable(String),

    /// The state store rejected or failed a read.
    #[error("state read failed for key {key}: {reason}")]
    ReadFailed {
        /// Key being read.
        key: String,
        /// Platform-supplied reason.
        reason: String,
    },

    /// The state store rejected or failed a write.
    #[error("state write failed for key {key}: {reason}")]
    WriteFailed {
        /// Key being written.
        key: String,
        /// Platform-supplied reason.
        reason: String,
    },

    /// Range scan could not be opened or iterated.
    #[error("range scan failed: {0}")]
    ScanFailed(String),
}

// =============================================================================
// CONTRACT ERRORS
// =============================================================================

/// Errors returned by shipment contract operations.
///
/// Any error aborts the invocation; the platform discards every write staged
/// by it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// Caller is not allowed to perform the operation.
    #[error("caller MSP {caller} not permitted: {reason}")]
    PermissionDenied {
        /// MSP of the invoking organization.
        caller: String,
        /// Which check failed.
        reason: String,
    },

    /// No shipment is stored under the id.
    #[error("shipment {0} not found")]
    NotFound(String),

    /// A shipment is already stored under the id.
    #[error("shipment {0} already exists")]
    AlreadyExists(String),

    /// A required argument was empty or the argument list was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Stored bytes could not be decoded into a shipment.
    #[error("corrupt shipment data for key {key}: {reason}")]
    Corrupt {
        /// Ledger key holding the bad value.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// The transaction named a function the contract does not export.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Failure reported by the ledger platform.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl ContractError {
    /// Classify this error into the shared taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::InvalidArgument(_) | Self::UnknownFunction(_) => ErrorKind::InvalidArgument,
            Self::Corrupt { .. } => ErrorKind::Corrupt,
            Self::Ledger(_) => ErrorKind::Transient,
        }
    }

    pub(crate) fn permission_denied(caller: &str, reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            caller: caller.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn corrupt(key: &str, err: &serde_json::Error) -> Self {
        Self::Corrupt {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
