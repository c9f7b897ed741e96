//! Consul agent registry client
//!
//! Talks to the local Consul agent's HTTP API:
//!
//! | operation  | request                                      |
//! |------------|----------------------------------------------|
//! | register   | `PUT /v1/agent/service/register`             |
//! | deregister | `PUT /v1/agent/service/deregister/{id}`      |
//! | lookup     | `GET /v1/agent/services`                     |

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use quest_core::{HealthCheck, QuestError, QuestResult, ServiceInstance};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::registry::RegistryClient;

/// Default registry request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

// =========================================================================
// Wire types
// =========================================================================

/// Body of `PUT /v1/agent/service/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AgentServiceRegistration {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub address: String,
    pub port: u16,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<AgentServiceCheck>,
}

/// HTTP check attached to a registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AgentServiceCheck {
    #[serde(rename = "HTTP")]
    pub http: String,
    pub interval: String,
    pub deregister_critical_service_after: String,
}

/// One entry of `GET /v1/agent/services`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AgentService {
    #[serde(rename = "ID")]
    pub id: String,
    pub service: String,
    #[serde(default)]
    pub address: String,
    pub port: u16,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl From<&ServiceInstance> for AgentServiceRegistration {
    fn from(instance: &ServiceInstance) -> Self {
        Self {
            id: instance.id.clone(),
            name: instance.name.clone(),
            address: instance.address.clone(),
            port: instance.port,
            tags: instance.tags.iter().cloned().collect(),
            check: instance.check.as_ref().map(AgentServiceCheck::from),
        }
    }
}

impl From<&HealthCheck> for AgentServiceCheck {
    fn from(check: &HealthCheck) -> Self {
        Self {
            http: check.http.clone(),
            interval: format!("{}s", check.interval_secs),
            deregister_critical_service_after: format!("{}s", check.deregister_after_secs),
        }
    }
}

impl AgentServiceRegistration {
    /// Convert back into the registry's view of an instance
    pub fn into_instance(self) -> ServiceInstance {
        ServiceInstance {
            name: self.name,
            id: self.id,
            address: self.address,
            port: self.port,
            tags: self.tags.into_iter().collect(),
            check: self.check.map(|c| HealthCheck {
                http: c.http,
                interval_secs: parse_seconds(&c.interval),
                deregister_after_secs: parse_seconds(&c.deregister_critical_service_after),
            }),
        }
    }
}

impl AgentService {
    fn into_instance(self, fallback_address: &str) -> ServiceInstance {
        // An empty address means "the agent's own address"
        let address = if self.address.is_empty() {
            fallback_address.to_string()
        } else {
            self.address
        };
        ServiceInstance {
            name: self.service,
            id: self.id,
            address,
            port: self.port,
            tags: self.tags.unwrap_or_default().into_iter().collect(),
            check: None,
        }
    }
}

fn parse_seconds(value: &str) -> u64 {
    value.trim_end_matches('s').parse().unwrap_or(0)
}

// =========================================================================
// Client
// =========================================================================

/// Registry client for a Consul agent
#[derive(Debug, Clone)]
pub struct ConsulRegistry {
    client: Client,
    base_url: Url,
}

impl ConsulRegistry {
    /// Create a client for the agent at `address` (e.g. "http://localhost:8500")
    pub fn new(address: &str) -> QuestResult<Self> {
        Self::with_timeout(address, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(address: &str, timeout: Duration) -> QuestResult<Self> {
        let base_url = Url::parse(address).map_err(|e| {
            QuestError::InvalidConfig(format!("Invalid registry address '{}': {}", address, e))
        })?;
        if base_url.host_str().is_none() {
            return Err(QuestError::InvalidConfig(format!(
                "Registry address '{}' has no host",
                address
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuestError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Get the agent base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the agent base URL, keeping
    /// any path prefix the address carries
    fn url(&self, segments: &[&str]) -> QuestResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                QuestError::InvalidConfig(format!(
                    "Registry address '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn agent_host(&self) -> &str {
        self.base_url.host_str().unwrap_or("localhost")
    }

    async fn rejected(response: reqwest::Response) -> QuestError {
        let status = response.status();
        let message = match response.text().await {
            Ok(body) if !body.is_empty() => body,
            _ => format!("HTTP {}", status),
        };
        QuestError::RegistryRejected {
            status: status.as_u16(),
            message,
        }
    }
}

fn unavailable(err: reqwest::Error) -> QuestError {
    QuestError::RegistryUnavailable(err.to_string())
}

#[async_trait]
impl RegistryClient for ConsulRegistry {
    #[instrument(skip(self, instance), fields(service = %instance.name, instance_id = %instance.id))]
    async fn register(&self, instance: &ServiceInstance) -> QuestResult<()> {
        let url = self.url(&["v1", "agent", "service", "register"])?;
        let body = AgentServiceRegistration::from(instance);
        debug!("Registering with {}", url);

        let response = self
            .client
            .put(url)
            .json(&body)
            .send()
            .await
            .map_err(unavailable)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::rejected(response).await)
        }
    }

    #[instrument(skip(self))]
    async fn deregister(&self, instance_id: &str) -> QuestResult<()> {
        let url = self.url(&["v1", "agent", "service", "deregister", instance_id])?;

        let response = self.client.put(url).send().await.map_err(unavailable)?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                debug!("Instance was not registered");
                Ok(())
            }
            _ => Err(Self::rejected(response).await),
        }
    }

    #[instrument(skip(self))]
    async fn lookup(&self, name: &str) -> QuestResult<Vec<ServiceInstance>> {
        let url = self.url(&["v1", "agent", "services"])?;

        let response = self.client.get(url).send().await.map_err(unavailable)?;
        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let services: BTreeMap<String, AgentService> = response
            .json()
            .await
            .map_err(|e| QuestError::Decode(format!("registry service list: {}", e)))?;

        let host = self.agent_host().to_string();
        let mut instances: Vec<ServiceInstance> = services
            .into_values()
            .filter(|s| s.service == name)
            .map(|s| s.into_instance(&host))
            .collect();
        instances.sort_by(|a, b| a.id.cmp(&b.id));

        debug!(count = instances.len(), "Lookup complete");
        Ok(instances)
    }
}
