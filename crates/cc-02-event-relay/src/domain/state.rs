//! # Relay State
//!
//! Lifecycle of the relay plus counters shared with the health endpoint.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Relay lifecycle.
///
/// ```text
/// Disconnected → Connecting → Subscribed → Draining → Closed
///                    │             │                     ↑
///                    └─ (fatal)    └─ (source closed) ───┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayState {
    /// Not started.
    Disconnected,
    /// Opening the gateway and subscription.
    Connecting,
    /// Receiving and broadcasting events.
    Subscribed,
    /// Cancellation observed; releasing the subscription.
    Draining,
    /// Terminal. No further broadcasts.
    Closed,
}

impl RelayState {
    /// Returns true once the relay can no longer broadcast.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Closed
    }

    /// Snake-case label used in logs and the health endpoint.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Subscribed => "subscribed",
            Self::Draining => "draining",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the receive loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Shutdown was requested.
    Cancelled,
    /// The event source closed its channel.
    SourceClosed,
}

/// Event counters.
#[derive(Debug, Default)]
pub struct RelayStats {
    received: AtomicU64,
    broadcast: AtomicU64,
    skipped: AtomicU64,
}

impl RelayStats {
    pub(crate) fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_broadcast(&self) {
        self.broadcast.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Items pulled from the event source, including undecodable ones.
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Events handed to the hub.
    pub fn broadcast(&self) -> u64 {
        self.broadcast.load(Ordering::Relaxed)
    }

    /// Events dropped because they failed to decode or encode.
    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }
}
