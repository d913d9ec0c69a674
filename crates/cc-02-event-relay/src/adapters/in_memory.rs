//! # In-Memory Gateway
//!
//! Feeds ledger events from an in-process channel. Used by tests and for
//! running the relay locally without a ledger network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::channel::{ChannelEvents, FeedItem};
use crate::domain::LedgerEvent;
use crate::errors::RelayError;
use crate::ports::outbound::{ConnectionGateway, GatewaySession, SubscriptionScope};

/// Producer side of an [`InMemoryGateway`]. Dropping it closes the stream.
#[derive(Debug, Clone)]
pub struct EventFeed {
    sender: mpsc::Sender<FeedItem>,
}

impl EventFeed {
    /// Queue an event for the relay.
    pub async fn publish(&self, event: LedgerEvent) -> Result<(), RelayError> {
        self.send(Ok(event)).await
    }

    /// Queue an undecodable item.
    pub async fn publish_corrupt(&self, reason: &str) -> Result<(), RelayError> {
        self.send(Err(RelayError::Corrupt(reason.to_string()))).await
    }

    async fn send(&self, item: FeedItem) -> Result<(), RelayError> {
        self.sender
            .send(item)
            .await
            .map_err(|_| RelayError::Transient("event stream closed".into()))
    }
}

/// Gateway backed by an in-process channel.
#[derive(Debug)]
pub struct InMemoryGateway {
    receiver: Mutex<Option<mpsc::Receiver<FeedItem>>>,
    connect_error: Option<String>,
    session_closed: Arc<AtomicBool>,
}

impl InMemoryGateway {
    /// Gateway plus the feed that drives it.
    #[must_use]
    pub fn new(buffer: usize) -> (Self, EventFeed) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let gateway = Self {
            receiver: Mutex::new(Some(receiver)),
            connect_error: None,
            session_closed: Arc::new(AtomicBool::new(false)),
        };
        (gateway, EventFeed { sender })
    }

    /// Gateway whose `connect` always fails with `reason`.
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self {
            receiver: Mutex::new(None),
            connect_error: Some(reason.to_string()),
            session_closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns true once the relay has closed its session.
    pub fn session_closed(&self) -> bool {
        self.session_closed.load(Ordering::Acquire)
    }
}

#[async_trait]
impl ConnectionGateway for InMemoryGateway {
    type Session = InMemorySession;

    async fn connect(&self) -> Result<Self::Session, RelayError> {
        if let Some(reason) = &self.connect_error {
            return Err(RelayError::Fatal(reason.clone()));
        }
        let receiver = self
            .receiver
            .lock()
            .take()
            .ok_or_else(|| RelayError::Fatal("in-memory gateway already connected".into()))?;

        Ok(InMemorySession {
            receiver: Some(receiver),
            closed: Arc::clone(&self.session_closed),
        })
    }
}

/// Session opened by [`InMemoryGateway`].
#[derive(Debug)]
pub struct InMemorySession {
    receiver: Option<mpsc::Receiver<FeedItem>>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl GatewaySession for InMemorySession {
    type Events = ChannelEvents;

    async fn subscribe(
        &mut self,
        scope: &SubscriptionScope,
        cancel: CancellationToken,
    ) -> Result<Self::Events, RelayError> {
        let receiver = self
            .receiver
            .take()
            .ok_or_else(|| RelayError::Transient("already subscribed".into()))?;
        debug!(channel = %scope.channel, contract = %scope.contract, "In-memory subscription opened");
        Ok(ChannelEvents::new(receiver, cancel))
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::Release);
    }
}
