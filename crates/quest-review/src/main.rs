//! quest-review - Quest review backend
//!
//! Usage:
//!   quest-review [--config config/quest-review.toml] [--port 5002]

use anyhow::Result;
use clap::Parser;
use quest_api::{init_tracing, run_backend, shutdown_signal};
use quest_core::REVIEWS_PATH;
use quest_review::{seed_reviews, Args};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_filter(), args.backend.log_json);

    info!("Starting quest-review");

    let config = args.load_config()?;
    info!(
        service = %config.service.name,
        host = %config.service.host,
        port = config.service.port,
        registry = %config.registry.address,
        "Configuration loaded"
    );

    if let Err(e) = run_backend(config, REVIEWS_PATH, seed_reviews(), shutdown_signal()).await {
        error!(error = %e, "quest-review failed");
        return Err(e.into());
    }

    Ok(())
}
