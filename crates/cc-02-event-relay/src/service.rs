//! # Relay Service
//!
//! Owns the event subscription lifecycle and drives the [`ClientHub`].
//!
//! ```text
//! Disconnected → Connecting → Subscribed → Draining → Closed
//! ```
//!
//! - Connect or subscribe failure is fatal; the relay closes and returns the
//!   error.
//! - Each event becomes one [`EventEnvelope`] broadcast to the hub, in the
//!   order the source yields them. Items that fail to decode or encode are
//!   logged and skipped.
//! - Cancelling the shutdown token cancels the subscription and closes the
//!   session. A source that closes on its own ends the relay without
//!   reconnecting.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::{EventEnvelope, LedgerEvent, RelayOutcome, RelayState, RelayStats};
use crate::errors::RelayError;
use crate::hub::ClientHub;
use crate::ports::outbound::{ConnectionGateway, EventSource, GatewaySession, SubscriptionScope};

/// Bridges one ledger event subscription to the hub.
#[derive(Debug)]
pub struct RelayService {
    hub: Arc<ClientHub>,
    scope: SubscriptionScope,
    state: watch::Sender<RelayState>,
    stats: Arc<RelayStats>,
}

impl RelayService {
    /// Relay for `scope` broadcasting into `hub`.
    pub fn new(hub: Arc<ClientHub>, scope: SubscriptionScope) -> Self {
        let (state, _) = watch::channel(RelayState::Disconnected);
        Self {
            hub,
            scope,
            state,
            stats: Arc::new(RelayStats::default()),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RelayState {
        *self.state.borrow()
    }

    /// Receiver that observes every state transition.
    pub fn watch_state(&self) -> watch::Receiver<RelayState> {
        self.state.subscribe()
    }

    /// Shared event counters.
    pub fn stats(&self) -> Arc<RelayStats> {
        Arc::clone(&self.stats)
    }

    /// Subscription scope.
    pub fn scope(&self) -> &SubscriptionScope {
        &self.scope
    }

    /// Run the relay until `shutdown` fires or the event source closes.
    ///
    /// Returns `Err` only for connect-phase failures, which are always fatal.
    pub async fn run<G>(
        &self,
        gateway: &G,
        shutdown: CancellationToken,
    ) -> Result<RelayOutcome, RelayError>
    where
        G: ConnectionGateway,
    {
        self.transition(RelayState::Connecting);

        let connected = tokio::select! {
            biased;
            _ = shutdown.cancelled() => None,
            result = gateway.connect() => Some(result),
        };
        let mut session = match connected {
            None => {
                info!("Shutdown requested before the gateway connected");
                self.transition(RelayState::Closed);
                return Ok(RelayOutcome::Cancelled);
            }
            Some(Ok(session)) => session,
            Some(Err(e)) => {
                error!(error = %e, "Gateway connection failed");
                self.transition(RelayState::Closed);
                return Err(e.into_fatal());
            }
        };

        let subscription = shutdown.child_token();
        let subscribed = tokio::select! {
            biased;
            _ = shutdown.cancelled() => None,
            result = session.subscribe(&self.scope, subscription.clone()) => Some(result),
        };
        let mut events = match subscribed {
            None => {
                info!("Shutdown requested before the subscription opened");
                session.close().await;
                self.transition(RelayState::Closed);
                return Ok(RelayOutcome::Cancelled);
            }
            Some(Ok(events)) => events,
            Some(Err(e)) => {
                error!(
                    channel = %self.scope.channel,
                    contract = %self.scope.contract,
                    error = %e,
                    "Event subscription failed"
                );
                session.close().await;
                self.transition(RelayState::Closed);
                return Err(e.into_fatal());
            }
        };

        self.transition(RelayState::Subscribed);
        info!(
            channel = %self.scope.channel,
            contract = %self.scope.contract,
            "Listening for ledger events"
        );

        let outcome = loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break RelayOutcome::Cancelled,
                item = events.next_event() => match item {
                    None => break RelayOutcome::SourceClosed,
                    Some(Ok(event)) => self.relay_event(event),
                    Some(Err(e)) => {
                        self.stats.record_received();
                        self.stats.record_skipped();
                        warn!(error = %e, "Skipping undecodable ledger event");
                    }
                },
            }
        };

        match outcome {
            RelayOutcome::Cancelled => {
                self.transition(RelayState::Draining);
                info!("Shutdown requested, cancelling event subscription");
            }
            RelayOutcome::SourceClosed => info!("Event channel closed"),
        }

        subscription.cancel();
        drop(events);
        session.close().await;
        self.transition(RelayState::Closed);

        info!(
            received = self.stats.received(),
            broadcast = self.stats.broadcast(),
            skipped = self.stats.skipped(),
            "Relay closed"
        );
        Ok(outcome)
    }

    fn relay_event(&self, event: LedgerEvent) {
        self.stats.record_received();
        let envelope = EventEnvelope::from(event);

        let json = match envelope.to_json() {
            Ok(json) => json,
            Err(e) => {
                self.stats.record_skipped();
                warn!(block = envelope.block_number, error = %e, "Failed to encode envelope");
                return;
            }
        };

        let report = self.hub.broadcast(Arc::from(json));
        self.stats.record_broadcast();
        info!(
            block = envelope.block_number,
            tx_id = %envelope.tx_id,
            subscribers = report.total(),
            delivered = report.delivered,
            "Broadcasting ledger event"
        );
    }

    fn transition(&self, next: RelayState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            debug!(from = %previous, to = %next, "Relay state changed");
        }
    }
}
