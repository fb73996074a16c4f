//! lectern-server entry point.
//!
//! Serves the article import and translation endpoints over HTTP. Settings
//! come from `LECTERN_*` environment variables; log filtering from `RUST_LOG`.

use anyhow::{Context, Result};
use lectern_core::{Reader, Translator};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod routes;

use config::ServerConfig;
use routes::{AppState, router};

const DEFAULT_LOG_FILTER: &str = "lectern_core=info,lectern_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();

    let config = ServerConfig::from_env();
    let state = AppState {
        reader: Reader::with_config(config.reader_config()),
        translator: Translator::new(config.translate.clone()).context("Failed to build translation client")?,
    };

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;

    tracing::info!(
        addr = %config.addr,
        translation = config.translate.enabled,
        model = %config.translate.model,
        "lectern server listening"
    );

    axum::serve(listener, router(state)).await.context("Server error")?;

    Ok(())
}
