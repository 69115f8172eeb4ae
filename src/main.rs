//! Edge embedding gateway (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                  EMBED GATEWAY                    │
//!     Client Request      │  ┌────────┐   ┌──────────┐   ┌────────────────┐  │
//!     ────────────────────┼─▶│  http  │──▶│ boundary │──▶│   dispatcher   │  │
//!                         │  │ server │   │ (500 on  │   │ GET/HEAD/      │  │
//!                         │  └────────┘   │  failure)│   │ OPTIONS/PURGE  │  │
//!                         │               └──────────┘   └───┬────────┬───┘  │
//!                         │                                  │        │      │
//!                         │                    ┌─────────────▼─┐   ┌──▼────┐ │
//!                         │                    │ cache (key,   │   │routing│ │
//!                         │                    │ lookup, store,│   │+leaf  │ │
//!                         │                    │ invalidate)   │   │handler│ │
//!                         │                    └───────────────┘   └───────┘ │
//!                         └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use embed_gateway::config::{load_config, GatewayConfig};
use embed_gateway::lifecycle::{self, Shutdown};
use embed_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "embed-gateway")]
#[command(about = "Edge embedding gateway with a shared response cache", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        bind_address = %config.listener.bind_address,
        excluded_hosts = config.cache.excluded_hosts.len(),
        "embed-gateway starting"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    lifecycle::start(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
