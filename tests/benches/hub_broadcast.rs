//! # Custody-Chain Benchmarks
//!
//! | Component | Operation | Target |
//! |-----------|-----------|--------|
//! | cc-02 Client Hub | Broadcast to N subscribers | < 1ms at 1000 |
//! | cc-02 Envelope | Encode ledger event | < 10us |
//! | cc-01 Contract | CreateShipment on mock ledger | < 50us |

use std::sync::Arc;

use cc_01_shipment_contract::{functions, InMemoryLedger, ShipmentContract};
use cc_02_event_relay::{ClientHub, EventEnvelope, HubMessage, SubscriberHandle};
use cc_tests::fixtures::{at, block_event, MANUFACTURER};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tokio::sync::mpsc;

// ============================================================================
// CC-02: Client Hub
// ============================================================================

fn bench_hub_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("cc-02-hub-broadcast");

    for subscribers in [1usize, 10, 100, 1000] {
        let hub = ClientHub::new();
        let mut queues: Vec<mpsc::Receiver<HubMessage>> = (0..subscribers)
            .map(|_| {
                let (handle, rx) = SubscriberHandle::channel(4);
                hub.add(handle);
                rx
            })
            .collect();
        let message: HubMessage = Arc::from(
            EventEnvelope::from(block_event(1))
                .to_json()
                .unwrap_or_default(),
        );

        group.throughput(Throughput::Elements(subscribers as u64));
        group.bench_with_input(
            BenchmarkId::new("broadcast", subscribers),
            &message,
            |b, message| {
                b.iter(|| {
                    let report = hub.broadcast(Arc::clone(message));
                    for queue in &mut queues {
                        while queue.try_recv().is_ok() {}
                    }
                    black_box(report.delivered)
                })
            },
        );
    }

    group.finish();
}

fn bench_envelope_encode(c: &mut Criterion) {
    let event = block_event(42);
    c.bench_function("cc-02-envelope-encode", |b| {
        b.iter(|| black_box(EventEnvelope::from(event.clone()).to_json().is_ok()))
    });
}

// ============================================================================
// CC-01: Shipment Contract
// ============================================================================

fn bench_create_shipment(c: &mut Criterion) {
    let contract = ShipmentContract::default();
    let mut ledger = InMemoryLedger::new();
    let mut n = 0u64;

    c.bench_function("cc-01-create-shipment", |b| {
        b.iter(|| {
            n += 1;
            let id = format!("SHIP{n}");
            let tx_id = format!("tx-{n}");
            let resp = ledger.mock_invoke(
                &contract,
                &tx_id,
                MANUFACTURER,
                at(0),
                functions::CREATE_SHIPMENT,
                &[id.as_str(), "Warsaw", "Berlin"],
            );
            black_box(resp.status)
        })
    });
}

criterion_group!(
    benches,
    bench_hub_broadcast,
    bench_envelope_encode,
    bench_create_shipment
);
criterion_main!(benches);
