//! Service resolver - logical name to endpoint

use std::sync::Arc;

use quest_core::{Endpoint, QuestError, QuestResult, ServiceInstance};
use tracing::{debug, instrument};

use crate::registry::RegistryClient;

/// Turns a logical service name into a reachable endpoint.
///
/// Every call queries the registry; nothing is cached. When several
/// instances share a name the first one returned is used. There is no
/// health awareness and no load distribution.
#[derive(Clone)]
pub struct ServiceResolver {
    registry: Arc<dyn RegistryClient>,
}

impl ServiceResolver {
    pub fn new(registry: Arc<dyn RegistryClient>) -> Self {
        Self { registry }
    }

    /// Resolve `name` to the first registered instance
    #[instrument(skip(self))]
    pub async fn resolve_instance(&self, name: &str) -> QuestResult<ServiceInstance> {
        let instance = self
            .registry
            .lookup(name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| QuestError::ServiceNotFound(name.to_string()))?;

        debug!(instance_id = %instance.id, address = %instance.address, port = instance.port, "Resolved");
        Ok(instance)
    }

    /// Resolve `name` to an endpoint
    pub async fn resolve(&self, name: &str) -> QuestResult<Endpoint> {
        self.resolve_instance(name).await.map(|i| i.endpoint())
    }
}
