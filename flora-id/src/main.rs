//! flora-id - Plant identification service
//!
//! Serves the record resolution pipeline over HTTP:
//! text search with disambiguation, photo identification, random facts and
//! encyclopedia details.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use flora_common::config::{load_or_default, ConfigPathResolver};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flora_id::AppState;

/// Command-line arguments for flora-id
#[derive(Parser, Debug)]
#[command(name = "flora-id")]
#[command(about = "Plant identification and record resolution service")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "FLORA_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(short, long, env = "FLORA_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is loaded before logging so the configured level applies
    let config_path = ConfigPathResolver::new("flora-id").resolve(args.config.as_deref());
    let config = load_or_default(config_path.as_deref()).context("Failed to load configuration")?;

    let log_file = match &config.logging.file {
        Some(path) => Some(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?,
        ),
        None => None,
    };

    // Initialize tracing (RUST_LOG overrides the configured level)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("flora_id={0},flora_common={0},tower_http=info", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(log_file.map(|file| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
        }))
        .init();

    info!("Starting flora-id v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Config: {}", path.display()),
        None => info!("Config: built-in defaults"),
    }

    let services = flora_id::config::build_services(&config).context("Failed to configure services")?;
    let app = flora_id::build_router(AppState::new(services));

    let port = args.port.unwrap_or(config.port);
    let bind = args.bind.unwrap_or_else(|| config.bind_address.clone());
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
