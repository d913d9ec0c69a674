//! # Relay Flows
//!
//! Relay service, hub and subscriber endpoint wired together with the
//! in-memory gateway standing in for the ledger peer.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use cc_02_event_relay::server::{self, ServerState};
    use cc_02_event_relay::{
        ClientHub, InMemoryGateway, RelayOutcome, RelayService, RelayState, SubscriberHandle,
        SubscriptionScope,
    };
    use futures::StreamExt;
    use tokio::time::{sleep, timeout};
    use tokio_tungstenite::tungstenite::Message;
    use tokio_util::sync::CancellationToken;

    use crate::fixtures::block_event;

    const WAIT: Duration = Duration::from_secs(5);

    fn scope() -> SubscriptionScope {
        SubscriptionScope::new("supplychain", "shipping")
    }

    fn block_number(text: &str) -> u64 {
        let value: serde_json::Value = serde_json::from_str(text).unwrap();
        value["blockNumber"].as_u64().unwrap()
    }

    async fn wait_for_subscribers(hub: &ClientHub, n: usize) {
        timeout(WAIT, async {
            while hub.len() != n {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_fan_out_to_websocket_subscribers() {
        let hub = Arc::new(ClientHub::new());
        let relay = Arc::new(RelayService::new(Arc::clone(&hub), scope()));

        let listener = server::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}/ws", listener.local_addr().unwrap());
        let server_task = tokio::spawn(server::serve(
            listener,
            ServerState::new(Arc::clone(&hub), relay.watch_state(), 16),
        ));

        let (mut alice, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
        let (mut bob, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
        wait_for_subscribers(&hub, 2).await;

        let (gateway, feed) = InMemoryGateway::new(16);
        for block in 1..=3 {
            feed.publish(block_event(block)).await.unwrap();
        }
        drop(feed);

        let outcome = timeout(WAIT, relay.run(&gateway, CancellationToken::new()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome, RelayOutcome::SourceClosed);

        for client in [&mut alice, &mut bob] {
            for expected in 1..=3 {
                let frame = timeout(WAIT, client.next()).await.unwrap().unwrap().unwrap();
                let Message::Text(text) = frame else {
                    panic!("expected text frame, got {frame:?}");
                };
                assert_eq!(block_number(&text), expected);
            }
        }

        server_task.abort();
    }

    #[tokio::test]
    async fn test_departed_subscriber_does_not_block_others() {
        let hub = Arc::new(ClientHub::new());
        let (gone, gone_rx) = SubscriberHandle::channel(4);
        let (stays, mut stays_rx) = SubscriberHandle::channel(4);
        hub.add(gone);
        hub.add(stays);
        drop(gone_rx);

        let (gateway, feed) = InMemoryGateway::new(4);
        feed.publish(block_event(9)).await.unwrap();
        drop(feed);

        let relay = RelayService::new(Arc::clone(&hub), scope());
        timeout(WAIT, relay.run(&gateway, CancellationToken::new()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(block_number(&stays_rx.recv().await.unwrap()), 9);
        assert_eq!(hub.len(), 2);
    }

    #[tokio::test]
    async fn test_shutdown_walks_state_machine() {
        let hub = Arc::new(ClientHub::new());
        let relay = Arc::new(RelayService::new(Arc::clone(&hub), scope()));
        let mut states = relay.watch_state();
        let (gateway, _feed) = InMemoryGateway::new(4);
        let gateway = Arc::new(gateway);
        let shutdown = CancellationToken::new();

        assert_eq!(relay.state(), RelayState::Disconnected);

        let task = {
            let relay = Arc::clone(&relay);
            let gateway = Arc::clone(&gateway);
            let shutdown = shutdown.clone();
            tokio::spawn(async move { relay.run(gateway.as_ref(), shutdown).await })
        };

        timeout(WAIT, states.wait_for(|s| *s == RelayState::Subscribed))
            .await
            .unwrap()
            .unwrap();

        shutdown.cancel();
        let outcome = timeout(WAIT, task).await.unwrap().unwrap().unwrap();

        assert_eq!(outcome, RelayOutcome::Cancelled);
        assert_eq!(relay.state(), RelayState::Closed);
        assert!(gateway.session_closed());
        assert_eq!(relay.stats().broadcast(), 0);
    }
}
