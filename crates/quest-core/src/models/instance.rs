//! Service instance and endpoint models

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One running, network-addressable process bound to a logical name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// Logical service name other components discover it by
    pub name: String,
    /// Instance identifier, unique among instances sharing `name`
    pub id: String,
    /// Host (IP or DNS name) the instance serves on
    pub address: String,
    /// Port the instance serves on
    pub port: u16,
    /// Routing metadata
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Optional health check the registry runs against this instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<HealthCheck>,
}

impl ServiceInstance {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        address: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            address: address.into(),
            port,
            tags: BTreeSet::new(),
            check: None,
        }
    }

    /// Add a routing tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Attach a registry-side health check
    pub fn with_check(mut self, check: HealthCheck) -> Self {
        self.check = Some(check);
        self
    }

    /// Network coordinates of this instance
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(&self.address, self.port)
    }
}

/// HTTP health check the registry polls to reclaim dead instances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// URL polled by the registry
    pub http: String,
    /// Poll interval in seconds
    pub interval_secs: u64,
    /// Remove the instance after it has been critical this long
    pub deregister_after_secs: u64,
}

/// A resolved network endpoint (host, port)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `http://{host}:{port}`, bracketing IPv6 literals
    pub fn base_url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    /// `http://{host}:{port}{path}`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') && !self.host.starts_with('[') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
