//! # Custody Telemetry
//!
//! Structured logging for Custody-Chain services.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use custody_telemetry::{init_tracing, TelemetryConfig};
//!
//! let config = TelemetryConfig::for_service("event-relay");
//! init_tracing(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CC_SERVICE_NAME` | `custody-chain` | Service name |
//! | `CC_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `CC_JSON_LOGS` | `false` (`true` in containers) | JSON log output |

mod config;
mod tracing_setup;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use tracing_setup::{build_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// The log filter directive did not parse.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed or could not be set.
    #[error("Failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),
}
