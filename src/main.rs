use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use mapping_proxy::config::{load_config, ProxyConfig};
use mapping_proxy::lifecycle::{listen_for_ctrl_c, Shutdown};
use mapping_proxy::observability::{logging, metrics};
use mapping_proxy::HttpServer;

/// Rule-mapping reverse proxy.
#[derive(Debug, Parser)]
#[command(name = "mapping-proxy", version)]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration before logging init so a bad file fails loudly.
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rules = config.rules.len(),
        rewrite_enabled = config.rewrite.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(listen_for_ctrl_c(shutdown));

    server.run(listener, rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
