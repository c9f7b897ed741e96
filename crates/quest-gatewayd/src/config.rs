//! Gateway daemon configuration

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use quest_core::{QuestError, QuestResult};
use quest_discovery::RegistryConfig;
use quest_gateway::RouteConfig;
use serde::{Deserialize, Serialize};

/// Gateway daemon configuration (TOML format)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Upper bound on one `/quests-reviews` request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Transport timeout for each backend fetch
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Connect timeout for each backend fetch
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub routes: RouteConfig,
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_request_timeout() -> u64 {
    30
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            request_timeout_secs: default_request_timeout(),
            fetch_timeout_secs: default_fetch_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            registry: RegistryConfig::default(),
            routes: RouteConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> QuestResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            QuestError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| QuestError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> QuestResult<()> {
        for (field, value) in [
            ("request_timeout_secs", self.request_timeout_secs),
            ("fetch_timeout_secs", self.fetch_timeout_secs),
            ("connect_timeout_secs", self.connect_timeout_secs),
        ] {
            if value == 0 {
                return Err(QuestError::InvalidConfig(format!(
                    "{} must be positive",
                    field
                )));
            }
        }
        let routes = &self.routes;
        for (field, value) in [
            ("catalog_service", &routes.catalog_service),
            ("review_service", &routes.review_service),
        ] {
            if value.trim().is_empty() {
                return Err(QuestError::InvalidConfig(format!(
                    "routes.{} must not be empty",
                    field
                )));
            }
        }
        for (field, value) in [
            ("catalog_path", &routes.catalog_path),
            ("review_path", &routes.review_path),
        ] {
            if !value.starts_with('/') {
                return Err(QuestError::InvalidConfig(format!(
                    "routes.{} must start with '/'",
                    field
                )));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
