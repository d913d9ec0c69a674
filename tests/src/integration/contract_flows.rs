//! # Contract Flows
//!
//! Multi-organization custody scenarios driven through the string-routed
//! transaction surface, the way client applications reach the contract.

#[cfg(test)]
mod tests {
    use cc_01_shipment_contract::{
        functions, status, InMemoryLedger, Response, Shipment, ShipmentContract,
    };

    use crate::fixtures::{at, CARRIER, MANUFACTURER, RETAILER};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Network {
        contract: ShipmentContract,
        ledger: InMemoryLedger,
        next_tx: u64,
        clock: i64,
    }

    impl Network {
        fn new() -> Self {
            Self {
                contract: ShipmentContract::default(),
                ledger: InMemoryLedger::new(),
                next_tx: 0,
                clock: 0,
            }
        }

        fn submit(&mut self, caller: &str, function: &str, args: &[&str]) -> Response {
            self.next_tx += 1;
            self.clock += 5;
            let tx_id = format!("tx-{}", self.next_tx);
            self.ledger
                .mock_invoke(&self.contract, &tx_id, caller, at(self.clock), function, args)
        }

        fn query(&mut self, id: &str) -> Shipment {
            let resp = self.submit(RETAILER, functions::QUERY_SHIPMENT, &[id]);
            assert!(resp.is_ok(), "query failed: {}", resp.message);
            serde_json::from_slice(&resp.payload).unwrap()
        }

        fn all(&mut self) -> Vec<Shipment> {
            let resp = self.submit(RETAILER, functions::GET_ALL_SHIPMENTS, &[]);
            assert!(resp.is_ok(), "scan failed: {}", resp.message);
            serde_json::from_slice(&resp.payload).unwrap()
        }
    }

    // =============================================================================
    // CUSTODY CHAIN
    // =============================================================================

    #[test]
    fn test_full_custody_chain() {
        let mut net = Network::new();

        assert!(net
            .submit(MANUFACTURER, functions::CREATE_SHIPMENT, &["SHIP1", "Warsaw", "Berlin"])
            .is_ok());
        let created = net.query("SHIP1");

        assert!(net
            .submit(MANUFACTURER, functions::TRANSFER_OWNERSHIP, &["SHIP1", CARRIER])
            .is_ok());
        assert!(net
            .submit(CARRIER, functions::UPDATE_STATUS, &["SHIP1", status::IN_TRANSIT])
            .is_ok());
        assert!(net
            .submit(CARRIER, functions::TRANSFER_OWNERSHIP, &["SHIP1", RETAILER])
            .is_ok());
        assert!(net
            .submit(RETAILER, functions::UPDATE_STATUS, &["SHIP1", status::DELIVERED])
            .is_ok());

        let delivered = net.query("SHIP1");
        assert_eq!(delivered.status, status::DELIVERED);
        assert_eq!(delivered.owner_msp, RETAILER);
        assert_eq!(delivered.origin, created.origin);
        assert_eq!(delivered.destination, created.destination);
        assert!(delivered.last_update > created.last_update);

        // Five writes, queries produce no blocks.
        assert_eq!(net.ledger.height(), 5);
        let functions_committed: Vec<_> = net
            .ledger
            .commits()
            .iter()
            .map(|c| c.function.as_str())
            .collect();
        assert_eq!(
            functions_committed,
            vec![
                functions::CREATE_SHIPMENT,
                functions::TRANSFER_OWNERSHIP,
                functions::UPDATE_STATUS,
                functions::TRANSFER_OWNERSHIP,
                functions::UPDATE_STATUS,
            ]
        );
    }

    #[test]
    fn test_status_update_by_bystander_takes_custody() {
        let mut net = Network::new();
        net.submit(MANUFACTURER, functions::CREATE_SHIPMENT, &["SHIP1", "Warsaw", "Berlin"]);

        let resp = net.submit(RETAILER, functions::UPDATE_STATUS, &["SHIP1", status::EXCEPTION]);
        assert!(resp.is_ok());
        assert_eq!(net.query("SHIP1").owner_msp, RETAILER);

        // The previous owner can no longer transfer.
        let resp = net.submit(MANUFACTURER, functions::TRANSFER_OWNERSHIP, &["SHIP1", CARRIER]);
        assert!(!resp.is_ok());
    }

    // =============================================================================
    // REJECTIONS LEAVE NO TRACE
    // =============================================================================

    #[test]
    fn test_rejected_transactions_do_not_commit() {
        let mut net = Network::new();
        net.submit(MANUFACTURER, functions::CREATE_SHIPMENT, &["SHIP1", "Warsaw", "Berlin"]);
        let before = net.query("SHIP1");
        let height = net.ledger.height();

        let rejected = [
            net.submit(CARRIER, functions::CREATE_SHIPMENT, &["SHIP2", "Oslo", "Rome"]),
            net.submit(MANUFACTURER, functions::CREATE_SHIPMENT, &["SHIP1", "Oslo", "Rome"]),
            net.submit(CARRIER, functions::UPDATE_STATUS, &["SHIP1", ""]),
            net.submit(CARRIER, functions::TRANSFER_OWNERSHIP, &["SHIP1", CARRIER]),
            net.submit(MANUFACTURER, functions::TRANSFER_OWNERSHIP, &["SHIP1", ""]),
            net.submit(CARRIER, functions::UPDATE_STATUS, &["NOPE", status::IN_TRANSIT]),
            net.submit(CARRIER, "DeleteShipment", &["SHIP1"]),
            net.submit(CARRIER, functions::QUERY_SHIPMENT, &[]),
        ];

        for resp in &rejected {
            assert_eq!(resp.status, 500);
            assert!(!resp.message.is_empty());
            assert!(resp.payload.is_empty());
        }
        assert_eq!(net.ledger.height(), height);
        assert_eq!(net.query("SHIP1"), before);
        assert_eq!(net.all().len(), 1);
    }

    #[test]
    fn test_error_messages_are_readable() {
        let mut net = Network::new();

        let resp = net.submit(CARRIER, functions::CREATE_SHIPMENT, &["SHIP1", "Warsaw", "Berlin"]);
        assert!(resp.message.contains("CarrierMSP"));

        let resp = net.submit(CARRIER, functions::QUERY_SHIPMENT, &["SHIP404"]);
        assert_eq!(resp.message, "shipment SHIP404 not found");
    }

    // =============================================================================
    // SCANS
    // =============================================================================

    #[test]
    fn test_get_all_tracks_creations() {
        let mut net = Network::new();
        assert!(net.all().is_empty());

        let ids: Vec<String> = (1..=12).map(|i| format!("SHIP{i:03}")).collect();
        for id in &ids {
            net.submit(MANUFACTURER, functions::CREATE_SHIPMENT, &[id.as_str(), "Gdansk", "Hamburg"]);
        }
        // Rejected creations do not count.
        net.submit(CARRIER, functions::CREATE_SHIPMENT, &["SHIP999", "Gdansk", "Hamburg"]);

        let all = net.all();
        assert_eq!(all.len(), ids.len());
        assert!(all.iter().all(|s| s.status == status::CREATED));
    }

    #[test]
    fn test_corrupt_record_fails_whole_scan() {
        let mut net = Network::new();
        net.submit(MANUFACTURER, functions::CREATE_SHIPMENT, &["SHIP1", "Warsaw", "Berlin"]);
        net.ledger.put_raw("SHIP0", b"\xff\xfe".to_vec());

        let resp = net.submit(RETAILER, functions::GET_ALL_SHIPMENTS, &[]);
        assert_eq!(resp.status, 500);
        assert!(resp.message.contains("SHIP0"));
    }
}
