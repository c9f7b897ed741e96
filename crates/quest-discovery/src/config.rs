//! Registry and registration configuration
//!
//! Loaded once at startup (usually as sections of a service's TOML file)
//! and immutable afterwards.

use std::net::SocketAddr;
use std::time::Duration;

use quest_core::{HealthCheck, QuestError, QuestResult, ServiceInstance};
use serde::{Deserialize, Serialize};

use crate::consul::ConsulRegistry;

/// Where the registry lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Consul agent address
    #[serde(default = "default_registry_address")]
    pub address: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_registry_timeout")]
    pub timeout_secs: u64,
}

fn default_registry_address() -> String {
    "http://localhost:8500".to_string()
}

fn default_registry_timeout() -> u64 {
    5
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            address: default_registry_address(),
            timeout_secs: default_registry_timeout(),
        }
    }
}

impl RegistryConfig {
    /// Build a Consul client for this registry
    pub fn connect(&self) -> QuestResult<ConsulRegistry> {
        ConsulRegistry::with_timeout(&self.address, Duration::from_secs(self.timeout_secs))
    }
}

/// How a backend instance presents itself to the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Logical service name
    pub name: String,

    /// Instance id; `{name}-{uuid}` when omitted
    #[serde(default)]
    pub id: Option<String>,

    /// Host advertised to the registry
    #[serde(default = "default_host")]
    pub host: String,

    /// Port advertised to the registry
    pub port: u16,

    /// Routing tag; `urlprefix-/{id}` when omitted
    #[serde(default)]
    pub tag: Option<String>,

    /// Local listen address; `0.0.0.0:{port}` when omitted
    #[serde(default)]
    pub bind: Option<SocketAddr>,

    /// Optional registry-side HTTP health check
    #[serde(default)]
    pub health_check: Option<HealthCheckConfig>,
}

fn default_host() -> String {
    "localhost".to_string()
}

/// Registry-side health check settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckConfig {
    #[serde(default = "default_health_path")]
    pub path: String,
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_deregister_after")]
    pub deregister_after_secs: u64,
}

fn default_health_path() -> String {
    "/health".to_string()
}

fn default_interval() -> u64 {
    10
}

fn default_deregister_after() -> u64 {
    60
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            path: default_health_path(),
            interval_secs: default_interval(),
            deregister_after_secs: default_deregister_after(),
        }
    }
}

impl RegistrationConfig {
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            id: None,
            host: host.into(),
            port,
            tag: None,
            bind: None,
            health_check: None,
        }
    }

    /// Reject configurations that cannot produce a discoverable instance
    pub fn validate(&self) -> QuestResult<()> {
        if self.name.trim().is_empty() {
            return Err(QuestError::InvalidConfig(
                "service name must not be empty".to_string(),
            ));
        }
        if self.host.trim().is_empty() {
            return Err(QuestError::InvalidConfig(
                "service host must not be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(QuestError::InvalidConfig(
                "service port must be positive".to_string(),
            ));
        }
        if matches!(self.id.as_deref(), Some(id) if id.trim().is_empty()) {
            return Err(QuestError::InvalidConfig(
                "instance id must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], self.port)))
    }

    /// Build the instance to register.
    ///
    /// Generates the instance id when none is configured, so call this once
    /// per process.
    pub fn to_instance(&self) -> QuestResult<ServiceInstance> {
        self.validate()?;

        let id = self
            .id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.name, uuid::Uuid::new_v4()));
        let tag = self
            .tag
            .clone()
            .unwrap_or_else(|| format!("urlprefix-/{}", id));

        let mut instance = ServiceInstance::new(&self.name, id, &self.host, self.port).with_tag(tag);
        if let Some(check) = &self.health_check {
            let http = instance.endpoint().url(&check.path);
            instance = instance.with_check(HealthCheck {
                http,
                interval_secs: check.interval_secs,
                deregister_after_secs: check.deregister_after_secs,
            });
        }
        Ok(instance)
    }
}
