//! quest-gatewayd - Quest gateway daemon
//!
//! Usage:
//!   quest-gatewayd [--config config/quest-gatewayd.toml] [--listen 0.0.0.0:5000]

use anyhow::Result;
use clap::Parser;
use quest_api::{init_tracing, shutdown_signal};
use quest_gatewayd::{build_router, Args};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_filter(), args.log_json);

    info!("Starting quest-gatewayd");

    let config = args.load_config()?;
    let app = build_router(&config)?;

    info!(
        registry = %config.registry.address,
        catalog = %config.routes.catalog_service,
        review = %config.routes.review_service,
        "Gateway configured"
    );

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!("Listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}
