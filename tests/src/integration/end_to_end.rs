//! # End-to-End Flow
//!
//! Contract transactions commit on the mock ledger, their writes are
//! published as ledger events, and a WebSocket subscriber sees each one as
//! an envelope carrying the updated shipment.
//!
//! ```text
//! ShipmentContract ─→ InMemoryLedger ─commits─→ InMemoryGateway
//!                                                     │
//!                                               RelayService ─→ ClientHub ─→ /ws client
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use cc_01_shipment_contract::{functions, status, InMemoryLedger, Shipment, ShipmentContract};
    use cc_02_event_relay::server::{self, ServerState};
    use cc_02_event_relay::{ClientHub, InMemoryGateway, RelayOutcome, RelayService, RelayState};
    use futures::StreamExt;
    use tokio::time::{sleep, timeout};
    use tokio_tungstenite::tungstenite::Message;
    use tokio_util::sync::CancellationToken;

    use crate::fixtures::{at, ledger_events, CARRIER, MANUFACTURER};

    const WAIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_ship1_created_then_in_transit() {
        // Relay side: hub, endpoint, subscriber.
        let hub = Arc::new(ClientHub::new());
        let relay = Arc::new(RelayService::new(
            Arc::clone(&hub),
            cc_02_event_relay::SubscriptionScope::new("supplychain", "shipping"),
        ));
        let listener = server::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}/ws", listener.local_addr().unwrap());
        let server_task = tokio::spawn(server::serve(
            listener,
            ServerState::new(Arc::clone(&hub), relay.watch_state(), 16),
        ));

        let (mut client, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
        timeout(WAIT, async {
            while hub.is_empty() {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        let (gateway, feed) = InMemoryGateway::new(16);
        let gateway = Arc::new(gateway);
        let shutdown = CancellationToken::new();
        let relay_task = {
            let relay = Arc::clone(&relay);
            let gateway = Arc::clone(&gateway);
            let shutdown = shutdown.clone();
            tokio::spawn(async move { relay.run(gateway.as_ref(), shutdown).await })
        };
        let mut states = relay.watch_state();
        timeout(WAIT, states.wait_for(|s| *s == RelayState::Subscribed))
            .await
            .unwrap()
            .unwrap();

        // Ledger side: two committed transactions.
        let contract = ShipmentContract::default();
        let mut ledger = InMemoryLedger::new();
        let created = ledger.mock_invoke(
            &contract,
            "tx-create",
            MANUFACTURER,
            at(0),
            functions::CREATE_SHIPMENT,
            &["SHIP1", "Warsaw", "Berlin"],
        );
        assert!(created.is_ok(), "{}", created.message);
        let moved = ledger.mock_invoke(
            &contract,
            "tx-move",
            CARRIER,
            at(45),
            functions::UPDATE_STATUS,
            &["SHIP1", status::IN_TRANSIT],
        );
        assert!(moved.is_ok(), "{}", moved.message);

        for commit in ledger.commits() {
            for event in ledger_events(commit) {
                feed.publish(event).await.unwrap();
            }
        }

        // Subscriber side: one envelope per commit, in commit order.
        let mut seen = Vec::new();
        for _ in 0..2 {
            let frame = timeout(WAIT, client.next()).await.unwrap().unwrap().unwrap();
            let Message::Text(text) = frame else {
                panic!("expected text frame, got {frame:?}");
            };
            let envelope: serde_json::Value = serde_json::from_str(&text).unwrap();
            let payload = STANDARD
                .decode(envelope["payload"].as_str().unwrap())
                .unwrap();
            let shipment: Shipment = serde_json::from_slice(&payload).unwrap();
            seen.push((
                envelope["blockNumber"].as_u64().unwrap(),
                envelope["txId"].as_str().unwrap().to_string(),
                envelope["eventName"].as_str().unwrap().to_string(),
                shipment,
            ));
        }

        let (block, tx_id, name, ship) = &seen[0];
        assert_eq!((*block, tx_id.as_str(), name.as_str()), (1, "tx-create", functions::CREATE_SHIPMENT));
        assert_eq!(ship.id, "SHIP1");
        assert_eq!(ship.status, status::CREATED);
        assert_eq!(ship.owner_msp, MANUFACTURER);
        assert_eq!((ship.origin.as_str(), ship.destination.as_str()), ("Warsaw", "Berlin"));

        let (block, tx_id, name, ship) = &seen[1];
        assert_eq!((*block, tx_id.as_str(), name.as_str()), (2, "tx-move", functions::UPDATE_STATUS));
        assert_eq!(ship.status, status::IN_TRANSIT);
        assert_eq!(ship.owner_msp, CARRIER);
        assert_eq!(ship.last_update, at(45));

        // The ledger agrees with what the subscriber saw.
        let query = ledger.mock_invoke(
            &contract,
            "tx-query",
            CARRIER,
            at(50),
            functions::QUERY_SHIPMENT,
            &["SHIP1"],
        );
        let current: Shipment = serde_json::from_slice(&query.payload).unwrap();
        assert_eq!(&current, ship);

        shutdown.cancel();
        let outcome = timeout(WAIT, relay_task).await.unwrap().unwrap().unwrap();
        assert_eq!(outcome, RelayOutcome::Cancelled);
        assert_eq!(relay.stats().broadcast(), 2);

        server_task.abort();
    }
}
