//! RegistryClient trait - capability over a shared discovery registry

use async_trait::async_trait;
use quest_core::{QuestResult, ServiceInstance};

/// Capability over the shared discovery registry.
///
/// Implementations must honour these semantics:
/// - `register` with an id that is already registered replaces it
/// - `deregister` of an unknown id succeeds without effect
/// - `lookup` of an unknown name returns an empty list, never an error
/// - `lookup` results are ordered by instance id
///
/// Transport-level failures surface as `QuestError::RegistryUnavailable`.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Register (or replace) an instance
    async fn register(&self, instance: &ServiceInstance) -> QuestResult<()>;

    /// Remove the instance with the given id
    async fn deregister(&self, instance_id: &str) -> QuestResult<()>;

    /// List instances currently registered under `name`
    async fn lookup(&self, name: &str) -> QuestResult<Vec<ServiceInstance>>;
}
