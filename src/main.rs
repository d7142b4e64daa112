// shellproxy - offline-first caching proxy for a single-page media app

use anyhow::Result;
use clap::Parser;
use shellproxy::cache::{CacheStore, MemoryStore};
use shellproxy::cli::Args;
use shellproxy::config::AppConfig;
use shellproxy::net::{HttpTransport, Transport};
use shellproxy::server::create_router;
use shellproxy::utils::logging;
use shellproxy::worker::{Event, HostRuntime, ProxyWorker, StandaloneHost};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let config = AppConfig::load()?;

    if args.show_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting shellproxy v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Wire up collaborators
    let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.upstream)?);
    let host: Arc<dyn HostRuntime> = Arc::new(StandaloneHost);
    let worker = Arc::new(ProxyWorker::new(&config, store, transport, host));

    // Phase 4: Install - seed the bootstrap set. A failed install aborts
    // startup, the same way a failed install marks a registration
    // unsuccessful in the browser.
    info!("Seeding bootstrap set from {}", config.upstream.origin);
    worker.dispatch(Event::InstallRequested).await?;

    // Phase 5: Activate - sweep stale cache generations
    worker.dispatch(Event::ActivateRequested).await?;

    // Phase 6: Build and start HTTP server
    let app = create_router(config.clone(), Arc::clone(&worker))?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 7: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
