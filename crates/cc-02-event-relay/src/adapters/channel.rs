//! Channel-backed event stream shared by the gateway adapters.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::LedgerEvent;
use crate::errors::RelayError;
use crate::ports::outbound::EventSource;

/// One item on an event channel.
pub type FeedItem = Result<LedgerEvent, RelayError>;

/// [`EventSource`] over a bounded mpsc receiver.
///
/// Once the subscription token fires the receiver is closed, so producers
/// see their channel shut and stop.
#[derive(Debug)]
pub struct ChannelEvents {
    receiver: mpsc::Receiver<FeedItem>,
    cancel: CancellationToken,
}

impl ChannelEvents {
    pub(crate) fn new(receiver: mpsc::Receiver<FeedItem>, cancel: CancellationToken) -> Self {
        Self { receiver, cancel }
    }
}

#[async_trait]
impl EventSource for ChannelEvents {
    async fn next_event(&mut self) -> Option<FeedItem> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                self.receiver.close();
                None
            }
            item = self.receiver.recv() => item,
        }
    }
}
