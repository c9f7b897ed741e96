//! Quest gateway daemon
//!
//! Serves `/quests-reviews`: every request resolves `quest-catalog` and
//! `quest-review` through Consul, fetches both and returns the joined list.
//! The gateway itself is not registered.

pub mod config;

pub use config::GatewayConfig;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use quest_api::gateway_router;
use quest_client::ServiceClient;
use quest_core::{QuestError, QuestResult};
use quest_discovery::{RegistryClient, ServiceResolver};
use quest_gateway::Aggregator;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "quest-gatewayd")]
#[command(about = "Quest gateway daemon")]
pub struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, env = "QUEST_GATEWAY_CONFIG")]
    pub config: Option<String>,

    /// Listen address
    #[arg(short, long, env = "QUEST_GATEWAY_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Consul agent address
    #[arg(long, env = "CONSUL_HTTP_ADDR")]
    pub registry: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "QUEST_GATEWAY_TIMEOUT")]
    pub request_timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    /// Load the config file, if any, and apply command-line overrides
    pub fn load_config(&self) -> QuestResult<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config from: {}", path);
                GatewayConfig::load(path)?
            }
            None => GatewayConfig::default(),
        };

        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(address) = &self.registry {
            config.registry.address = address.clone();
        }
        if let Some(secs) = self.request_timeout {
            config.request_timeout_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "quest_gatewayd=debug,quest_api=debug,quest_gateway=debug,quest_discovery=debug,quest_client=debug,tower_http=debug"
        } else {
            "quest_gatewayd=info,quest_api=info,quest_gateway=info,quest_discovery=info"
        }
    }
}

/// Build the gateway router backed by the configured Consul agent
pub fn build_router(config: &GatewayConfig) -> QuestResult<Router> {
    let registry: Arc<dyn RegistryClient> = Arc::new(config.registry.connect()?);
    build_router_with(config, registry)
}

/// Build the gateway router on top of an existing registry client
pub fn build_router_with(
    config: &GatewayConfig,
    registry: Arc<dyn RegistryClient>,
) -> QuestResult<Router> {
    let client = ServiceClient::with_config(config.fetch_timeout(), config.connect_timeout())
        .map_err(QuestError::from)?;
    let aggregator =
        Aggregator::new(ServiceResolver::new(registry), client).with_routes(config.routes.clone());

    Ok(gateway_router(aggregator, config.request_timeout()))
}
