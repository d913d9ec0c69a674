//! # Event Relay Binary
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load configuration from the environment
//! 3. Install the SIGINT/SIGTERM handler
//! 4. Bind the subscriber listener and start serving `/ws`
//! 5. Connect to the ledger peer and relay events until shutdown
//!
//! Any failure before step 5 completes its connect phase exits with code 1.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use cc_02_event_relay::server::{self, ServerState};
use cc_02_event_relay::{ClientHub, PeerGateway, RelayConfig, RelayOutcome, RelayService};
use custody_telemetry::{init_tracing, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(&TelemetryConfig::for_service("event-relay"))?;

    let config = RelayConfig::from_env().context("invalid relay configuration")?;
    info!(
        msp_id = %config.msp_id,
        peer = %config.peer_endpoint,
        channel = %config.channel_name,
        contract = %config.contract_name,
        "Starting ledger event relay"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let hub = Arc::new(ClientHub::new());
    let relay = RelayService::new(Arc::clone(&hub), config.scope());

    let listener = server::bind(&config.listen_addr()).await?;
    let state = ServerState::new(Arc::clone(&hub), relay.watch_state(), config.subscriber_buffer);
    let server_task = tokio::spawn(server::serve(listener, state));

    let gateway = PeerGateway::from_config(&config)?;
    let outcome = relay.run(&gateway, shutdown.clone()).await;

    // Open subscriber connections are not drained.
    server_task.abort();

    match outcome? {
        RelayOutcome::Cancelled => info!("Relay stopped by shutdown signal"),
        RelayOutcome::SourceClosed => warn!("Ledger event stream ended"),
    }
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal(shutdown: CancellationToken) {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut interrupt, mut terminate) = match (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) {
        (Ok(i), Ok(t)) => (i, t),
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Failed to install signal handlers, falling back to Ctrl+C");
            let _ = tokio::signal::ctrl_c().await;
            shutdown.cancel();
            return;
        }
    };

    tokio::select! {
        _ = interrupt.recv() => info!("Received SIGINT"),
        _ = terminate.recv() => info!("Received SIGTERM"),
    }
    shutdown.cancel();
}

#[cfg(not(unix))]
async fn wait_for_signal(shutdown: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl+C");
    }
    shutdown.cancel();
}
