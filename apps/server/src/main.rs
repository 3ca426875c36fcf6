//! veoovibes Server - Headless bridge for a veoovibes controller.
//!
//! Polls one controller, keeps a per-room state snapshot, and exposes room
//! entities and commands over a small HTTP API.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use veoovibes_core::{
    setup, start_server, validate_connection, AppState, EventEmitter, LoggingEventEmitter,
};

use crate::config::ServerConfig;

/// veoovibes Server - Multi-room audio bridge for veoovibes controllers.
#[derive(Parser, Debug)]
#[command(name = "veoovibes-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "info", env = "VEOOVIBES_LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// Controller host (overrides config file).
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Bind port (overrides config file).
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Seconds between refresh cycles (overrides config file).
    #[arg(short = 's', long)]
    scan_interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_timestamp_millis()
        .init();

    log::info!("veoovibes Server v{}", env!("CARGO_PKG_VERSION"));

    let mut config =
        ServerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Apply CLI overrides
    if let Some(host) = args.host {
        config.host = Some(host);
    }
    if let Some(port) = args.port {
        config.bind_port = port;
    }
    if let Some(interval) = args.scan_interval {
        config.scan_interval = interval;
    }

    let core_config = config.to_core_config()?;
    log::info!(
        "Configuration: host={}, scan_interval={}s, bind_port={}",
        core_config.host,
        core_config.scan_interval_secs,
        config.bind_port
    );

    let info = validate_connection(&core_config)
        .await
        .context("Controller connectivity check failed")?;
    log::info!("Connected to {} ({} rooms)", info.title, info.room_count);

    let emitter: Arc<dyn EventEmitter> = Arc::new(LoggingEventEmitter);
    let services = setup(core_config, Some(emitter))
        .await
        .context("Failed to set up integration")?;

    let refresh_handle = services.start();
    log::info!("Refresh loop started");

    let app_state = AppState::new(services.clone());
    start_server(app_state, config.bind_port, shutdown_signal())
        .await
        .context("HTTP server failed")?;

    log::info!("Shutdown signal received, cleaning up...");

    services.shutdown();
    if let Err(e) = refresh_handle.await {
        log::warn!("Refresh loop ended abnormally: {}", e);
    }

    log::info!("Shutdown complete");
    Ok(())
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
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
