// Payee Contract - Web Server
// Boundary validation and dashboard summaries over HTTP

use anyhow::{Context, Result};
use payee_contract::{api, ContractConfig, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ContractConfig::from_env().context("Invalid contract configuration")?;
    let server = ServerConfig::from_env();

    info!(
        review_threshold = config.review_threshold,
        share_tolerance = config.share_tolerance,
        "Loaded contract configuration"
    );

    let app = api::router(config);

    let listener = tokio::net::TcpListener::bind(&server.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", server.addr))?;

    info!(addr = %server.addr, version = payee_contract::VERSION, "Server running");

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
