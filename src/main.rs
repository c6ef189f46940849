//! `command-gateway` binary: load config, wire the engine client, serve.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use command_gateway::backend::TcpCommandClient;
use command_gateway::config::{load_config, GatewayConfig};
use command_gateway::lifecycle::{wait_for_signal, Shutdown};
use command_gateway::observability::{logging, metrics};
use command_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "command-gateway")]
#[command(about = "HTTP gateway in front of a backend command engine", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "command-gateway starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.address,
        max_body_bytes = config.listener.max_body_bytes,
        request_timeout_secs = config.timeouts.request_secs,
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

    let engine = Arc::new(TcpCommandClient::new(&config.backend));
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config, engine)?;

    let shutdown = Shutdown::new();
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        result = &mut server_task => {
            result??;
            tracing::warn!("HTTP server exited before a shutdown signal");
            return Ok(());
        }
        _ = wait_for_signal() => shutdown.trigger(),
    }

    server_task.await??;
    tracing::info!("Shutdown complete");
    Ok(())
}
