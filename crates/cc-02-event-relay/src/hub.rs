//! # Client Hub
//!
//! Registry of live subscriber connections.
//!
//! Membership changes take the write lock. `broadcast` copies the handle set
//! under the read lock and delivers outside it, so a broadcast never blocks
//! `add`/`remove` for longer than the copy, and never waits on a subscriber.
//! Each subscriber owns a bounded queue drained by its connection's writer
//! task; a full queue means that subscriber misses the message.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Default per-subscriber queue capacity.
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 64;

/// One serialized envelope, shared by every subscriber queue.
pub type HubMessage = Arc<str>;

/// Identity of one subscriber connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sending side of one subscriber connection.
///
/// Equality is id equality.
#[derive(Debug, Clone)]
pub struct SubscriberHandle {
    id: ConnectionId,
    sender: mpsc::Sender<HubMessage>,
}

impl SubscriberHandle {
    /// Create a handle and the receiver its writer task drains.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<HubMessage>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (
            Self {
                id: ConnectionId::new(),
                sender,
            },
            receiver,
        )
    }

    /// Connection id.
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl PartialEq for SubscriberHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SubscriberHandle {}

/// Per-call delivery summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers whose queue accepted the message.
    pub delivered: usize,
    /// Subscribers skipped because their queue was full.
    pub dropped: usize,
    /// Subscribers whose connection has already gone away.
    pub failed: usize,
}

impl BroadcastReport {
    /// Subscribers in the snapshot.
    #[must_use]
    pub fn total(&self) -> usize {
        self.delivered + self.dropped + self.failed
    }
}

/// Thread-safe subscriber registry.
#[derive(Debug, Default)]
pub struct ClientHub {
    clients: RwLock<HashMap<ConnectionId, SubscriberHandle>>,
}

impl ClientHub {
    /// Empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. Adding the same handle twice is a no-op.
    pub fn add(&self, handle: SubscriberHandle) {
        let id = handle.id;
        let mut clients = self.clients.write();
        if clients.insert(id, handle).is_none() {
            debug!(connection = %id, subscribers = clients.len(), "Subscriber added");
        }
    }

    /// Unregister a subscriber. Unknown ids are ignored.
    pub fn remove(&self, id: ConnectionId) {
        let mut clients = self.clients.write();
        if clients.remove(&id).is_some() {
            debug!(connection = %id, subscribers = clients.len(), "Subscriber removed");
        }
    }

    /// Returns true if `id` is registered.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.clients.read().contains_key(&id)
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    /// Returns true when nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.clients.read().is_empty()
    }

    /// Queue `message` for every subscriber registered at call time.
    ///
    /// Never blocks on a subscriber. Failing subscribers stay registered;
    /// their connection task removes them when it exits.
    pub fn broadcast(&self, message: HubMessage) -> BroadcastReport {
        let snapshot: Vec<SubscriberHandle> = self.clients.read().values().cloned().collect();

        let mut report = BroadcastReport::default();
        for handle in &snapshot {
            match handle.sender.try_send(Arc::clone(&message)) {
                Ok(()) => report.delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(connection = %handle.id, "Subscriber queue full, message dropped");
                    report.dropped += 1;
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(connection = %handle.id, "Subscriber connection closed");
                    report.failed += 1;
                }
            }
        }
        report
    }
}
