//! address_server: HTTP facade over the bpost address validation service.
//!
//! See `config.rs` for the environment variables it reads.

use std::sync::Arc;

use address_validator::config::ServerConfig;
use address_validator::dataset::load_aliases;
use address_validator::router::{build_router, AppState};
use address_validator::{AddressSchema, HttpValidationClient};
use anyhow::{Context, Result};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,address_validator=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let aliases = load_aliases(&config.alias_file)?;
    let client = HttpValidationClient::new(config.endpoint.clone())?;
    tracing::info!(
        endpoint = %config.endpoint,
        timeout_ms = config.timeout_ms,
        "Using address validation service"
    );

    let state = AppState {
        aliases: Arc::new(aliases),
        schema: Arc::new(AddressSchema::new()?),
        client: Arc::new(client),
        timeout_ms: config.timeout_ms,
        include_raw_response: config.include_raw_response,
    };
    let app = build_router(state, &config.static_dir);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("address_server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
