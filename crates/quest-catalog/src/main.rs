//! quest-catalog - Quest catalog backend
//!
//! Usage:
//!   quest-catalog [--config config/quest-catalog.toml] [--port 5001]

use anyhow::Result;
use clap::Parser;
use quest_api::{init_tracing, run_backend, shutdown_signal};
use quest_catalog::{seed_quests, Args};
use quest_core::QUESTS_PATH;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_filter(), args.backend.log_json);

    info!("Starting quest-catalog");

    let config = args.load_config()?;
    info!(
        service = %config.service.name,
        host = %config.service.host,
        port = config.service.port,
        registry = %config.registry.address,
        "Configuration loaded"
    );

    if let Err(e) = run_backend(config, QUESTS_PATH, seed_quests(), shutdown_signal()).await {
        error!(error = %e, "quest-catalog failed");
        return Err(e.into());
    }

    Ok(())
}
