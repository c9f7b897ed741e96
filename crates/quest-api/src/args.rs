//! Command-line options shared by the record backends

use clap::Args;
use quest_core::QuestResult;
use quest_discovery::RegistrationConfig;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::BackendConfig;

/// Options every record backend accepts.
///
/// Flattened into each backend's own `Parser`, which supplies the binary
/// name and its default identity.
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Configuration file path (TOML format)
    #[arg(short, long, env = "QUEST_CONFIG")]
    pub config: Option<String>,

    /// Host advertised to the registry
    #[arg(long, env = "QUEST_HOST")]
    pub host: Option<String>,

    /// Port to listen on and advertise
    #[arg(short, long, env = "QUEST_PORT")]
    pub port: Option<u16>,

    /// Instance id (generated when unset)
    #[arg(long, env = "QUEST_INSTANCE_ID")]
    pub id: Option<String>,

    /// Consul agent address
    #[arg(long, env = "CONSUL_HTTP_ADDR")]
    pub registry: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl BackendArgs {
    /// Load the config file, or start from `defaults` when there is none,
    /// then apply command-line overrides.
    ///
    /// A port override also moves an explicit `bind` address to that port,
    /// so the advertised port is the one being served.
    pub fn load_config<T: DeserializeOwned>(
        &self,
        defaults: RegistrationConfig,
    ) -> QuestResult<BackendConfig<T>> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config from: {}", path);
                BackendConfig::load(path)?
            }
            None => BackendConfig::new(defaults),
        };

        if let Some(host) = &self.host {
            config.service.host = host.clone();
        }
        if let Some(port) = self.port {
            config.service.port = port;
            if let Some(bind) = config.service.bind.as_mut() {
                bind.set_port(port);
            }
        }
        if let Some(id) = &self.id {
            config.service.id = Some(id.clone());
        }
        if let Some(address) = &self.registry {
            config.registry.address = address.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Default log filter for the binary whose crate is `target`
    pub fn log_filter(&self, target: &str) -> String {
        if self.verbose {
            format!(
                "{}=debug,quest_api=debug,quest_discovery=debug,tower_http=debug",
                target
            )
        } else {
            format!("{}=info,quest_api=info,quest_discovery=info", target)
        }
    }
}
