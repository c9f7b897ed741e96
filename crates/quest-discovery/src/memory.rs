//! In-memory registry

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use quest_core::{QuestError, QuestResult, ServiceInstance};
use tracing::debug;

use crate::registry::RegistryClient;

/// Registry that lives in process memory.
///
/// Instances are keyed by id, so re-registering an id replaces the previous
/// entry in a single write. `set_available(false)` makes every call fail
/// with `RegistryUnavailable`, which is how tests model an outage.
#[derive(Debug)]
pub struct MemoryRegistry {
    instances: RwLock<BTreeMap<String, ServiceInstance>>,
    available: AtomicBool,
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self {
            instances: RwLock::new(BTreeMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle simulated reachability
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Whether an instance with this id is registered
    pub fn contains(&self, instance_id: &str) -> bool {
        self.instances.read().contains_key(instance_id)
    }

    /// Every registered instance, ordered by id
    pub fn all(&self) -> Vec<ServiceInstance> {
        self.instances.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.instances.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.read().is_empty()
    }

    fn ensure_available(&self) -> QuestResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(QuestError::RegistryUnavailable(
                "in-memory registry marked unavailable".to_string(),
            ))
        }
    }
}

#[async_trait]
impl RegistryClient for MemoryRegistry {
    async fn register(&self, instance: &ServiceInstance) -> QuestResult<()> {
        self.ensure_available()?;
        debug!(service = %instance.name, instance_id = %instance.id, "Registering instance");
        self.instances
            .write()
            .insert(instance.id.clone(), instance.clone());
        Ok(())
    }

    async fn deregister(&self, instance_id: &str) -> QuestResult<()> {
        self.ensure_available()?;
        if self.instances.write().remove(instance_id).is_some() {
            debug!(instance_id = %instance_id, "Deregistered instance");
        }
        Ok(())
    }

    async fn lookup(&self, name: &str) -> QuestResult<Vec<ServiceInstance>> {
        self.ensure_available()?;
        Ok(self
            .instances
            .read()
            .values()
            .filter(|i| i.name == name)
            .cloned()
            .collect())
    }
}
