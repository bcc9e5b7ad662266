//! Port Ledger server entry point.
//!
//! Startup order:
//! 1. Load and validate configuration, initialise tracing
//! 2. Load the reservation table from disk
//! 3. Start the snapshot refresher (unless the cluster is unreachable)
//! 4. Serve HTTP until Ctrl-C / SIGTERM

use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use port_ledger::adapters::http::{app_router, LedgerAppState};
use port_ledger::adapters::{JsonFileReservationTable, KubernetesConfig, KubernetesServiceInventory};
use port_ledger::application::{PortLedger, SnapshotRefresher, SnapshotRefresherConfig};
use port_ledger::config::{AppConfig, ClusterConfig, LogFormat, ServerConfig};
use port_ledger::ports::{InventoryError, ServiceInventory};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let range = config.ports.range()?;
    let table = Arc::new(JsonFileReservationTable::new(&config.storage.reservations_file));
    let ledger = Arc::new(PortLedger::load(range, table).await.map_err(|e| {
        tracing::error!(
            path = %config.storage.reservations_file.display(),
            error = %e,
            "Cannot load reservation table"
        );
        e
    })?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let refresher_handle = match cluster_inventory(&config.cluster) {
        Ok(inventory) => {
            let refresher_config = SnapshotRefresherConfig::default()
                .with_poll_interval(config.cluster.poll_interval())
                .with_query_timeout(config.cluster.request_timeout());
            let refresher =
                SnapshotRefresher::with_config(inventory, ledger.clone(), refresher_config);
            let shutdown = shutdown_rx.clone();
            Some(tokio::spawn(async move { refresher.run(shutdown).await }))
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Running without cluster connection, live ports will not be tracked"
            );
            None
        }
    };

    let app = app_router(LedgerAppState::new(ledger), config.server.request_timeout());
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, min_port = range.min(), max_port = range.max(), "Port ledger listening");

    let mut server_shutdown = shutdown_rx;
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = server_shutdown.wait_for(|stop| *stop).await;
    });

    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    server.await?;

    if let Some(handle) = refresher_handle {
        handle.await?;
    }
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    match server.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Build the cluster inventory, or explain why there is none.
fn cluster_inventory(cluster: &ClusterConfig) -> Result<Arc<dyn ServiceInventory>, InventoryError> {
    if !cluster.enabled {
        return Err(InventoryError::Credentials(
            "cluster access disabled by configuration".to_string(),
        ));
    }

    let mut k8s = match &cluster.api_url {
        Some(url) => {
            let mut k8s = KubernetesConfig::new(url.clone(), String::new());
            k8s.load_token(&cluster.token_path)?;
            if let Ok(pem) = std::fs::read(&cluster.ca_path) {
                k8s = k8s.with_ca_pem(pem);
            }
            k8s
        }
        None => KubernetesConfig::in_cluster(&cluster.token_path, &cluster.ca_path)?,
    };
    k8s = k8s.with_timeout(cluster.request_timeout());

    Ok(Arc::new(KubernetesServiceInventory::new(k8s)?))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
