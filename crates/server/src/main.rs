//! Syracuse server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use syracuse_core::config::AppConfig;
use syracuse_server::{AppState, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Syracuse - a cached Collatz sequence calculator
#[derive(Parser, Debug)]
#[command(name = "syracused")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "SYRACUSE_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

fn load_config(path: &str) -> Result<AppConfig> {
    let mut figment = Figment::new();
    if std::path::Path::new(path).exists() {
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::warn!(path, "config file not found, using defaults and environment");
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("SYRACUSE_").split("__"))
        .extract()
        .context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = load_config(&args.config)?;

    if config.server.metrics_enabled {
        syracuse_server::metrics::register_metrics();
    }

    let storage = syracuse_storage::from_config(&config.storage)
        .await
        .context("Failed to initialize storage")?;
    storage
        .health_check()
        .await
        .context("Storage health check failed")?;
    tracing::info!(backend = storage.backend_name(), "blob storage ready");

    let metadata = syracuse_metadata::from_config(&config.metadata)
        .await
        .context("Failed to initialize metadata store")?;
    metadata
        .health_check()
        .await
        .context("Metadata health check failed")?;
    tracing::info!(backend = metadata.backend_name(), "metadata store ready");

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.bind))?;

    let state = AppState::new(config, storage, metadata);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "syracused listening");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result.context("Server error")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
