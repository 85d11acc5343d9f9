//! `rpc-failover` daemon: runs the health prober against the configured
//! endpoints and serves their status over HTTP.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use rpc_failover::admin::setup_admin_router;
use rpc_failover::config::load_config;
use rpc_failover::lifecycle::signals::shutdown_signal;
use rpc_failover::observability::{logging, metrics};
use rpc_failover::FailoverManager;

#[derive(Parser)]
#[command(name = "rpc-failover")]
#[command(about = "Health-checked failover across JSON-RPC endpoints", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "failover.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "rpc-failover starting");

    tracing::info!(
        config = %args.config.display(),
        max_retries = config.retries.max_retries,
        breaker_threshold = config.circuit_breaker.threshold,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let manager = Arc::new(FailoverManager::from_config(&config)?);
    tracing::info!(endpoints = manager.endpoint_count(), "Failover manager ready");
    manager.start();

    if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        tracing::info!(address = %listener.local_addr()?, "Status server listening");
        axum::serve(listener, setup_admin_router(manager.clone()))
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        shutdown_signal().await;
    }

    manager.stop().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
