//! Analytics relay entry point.
//!
//! A transparent reverse proxy in front of a split analytics provider.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                ANALYTICS RELAY               │
//!                    │                                              │
//!   Client Request   │  ┌────────┐   ┌──────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│  http  │──▶│ routing  │──▶│   proxy   │  │
//!                    │  │ server │   │classifier│   │ pipeline  │  │
//!                    │  └────────┘   └──────────┘   └─────┬─────┘  │
//!                    │                                    │        │
//!                    │                    static ┌────────┴──┐ api │
//!                    │                           ▼           ▼     │
//!                    │                     ┌─────────┐ ┌─────────┐ │    Upstream
//!   Client Response  │                     │  asset  │ │transport│─┼──▶ API host /
//!   ◀────────────────┼─────────────────────│  cache  │ │ client  │ │    asset host
//!                    │                     └─────────┘ └─────────┘ │
//!                    │                                              │
//!                    │  config ─ observability ─ lifecycle          │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use analytics_relay::{config, observability, HttpServer, RelayConfig, Shutdown};

#[derive(Parser, Debug)]
#[command(
    name = "analytics-relay",
    about = "Transparent relay for split analytics upstreams"
)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::loader::load_config(path)?,
        None => RelayConfig::default(),
    };

    observability::logging::init(&config.observability.log_level);

    tracing::info!("analytics-relay v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_base = %config.upstream.api_base,
        asset_base = %config.upstream.asset_base,
        cache_ttl_secs = config.cache.ttl_secs,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.listener();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
