//! # Error Types
//!
//! Relay failures split by what the caller should do about them:
//! stop the process, retry, or drop the one event.

use thiserror::Error;

/// Configuration problems detected at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to a value that does not parse.
    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        /// Environment variable name.
        var: &'static str,
        /// Raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A required value is empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Errors raised by the relay and its gateway adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Unrecoverable startup or resource failure. The process exits 1.
    #[error("fatal: {0}")]
    Fatal(String),

    /// Connection-level failure that a caller may retry.
    #[error("transient: {0}")]
    Transient(String),

    /// One event could not be decoded or encoded. Skipped.
    #[error("corrupt event: {0}")]
    Corrupt(String),

    /// Startup configuration was invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RelayError {
    /// Returns true if this error must terminate the process.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_) | Self::Config(_))
    }

    /// Reclassify a connect-phase error as fatal.
    #[must_use]
    pub fn into_fatal(self) -> Self {
        match self {
            Self::Transient(msg) | Self::Corrupt(msg) => Self::Fatal(msg),
            other => other,
        }
    }
}
