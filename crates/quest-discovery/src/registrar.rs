//! Instance registrar - binds a backend instance to its logical name
//!
//! ```text
//!                 register() ok
//!  Unregistered ─────────────────▶ Registered
//!       ▲                              │
//!       └──────────────────────────────┘
//!          deregister() (ok or failed)
//! ```
//!
//! A failed `register()` leaves the registrar Unregistered; callers treat it
//! as fatal. `deregister()` always lands in Unregistered, even when the
//! registry call fails, and repeated calls are no-ops. Dropping a registrar
//! that is still Registered spawns a best-effort deregistration.

use std::sync::Arc;

use quest_core::{QuestResult, ServiceInstance};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::registry::RegistryClient;

/// Registration state of an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Unregistered,
    Registered,
}

/// Owns one instance's registration for the lifetime of the process
pub struct InstanceRegistrar {
    registry: Arc<dyn RegistryClient>,
    instance: ServiceInstance,
    state: Mutex<RegistrationState>,
}

impl InstanceRegistrar {
    pub fn new(registry: Arc<dyn RegistryClient>, instance: ServiceInstance) -> Self {
        Self {
            registry,
            instance,
            state: Mutex::new(RegistrationState::Unregistered),
        }
    }

    /// The instance this registrar manages
    pub fn instance(&self) -> &ServiceInstance {
        &self.instance
    }

    /// Current registration state
    pub async fn state(&self) -> RegistrationState {
        *self.state.lock().await
    }

    /// Register the instance. No-op when already registered.
    pub async fn register(&self) -> QuestResult<()> {
        let mut state = self.state.lock().await;
        if *state == RegistrationState::Registered {
            debug!(instance_id = %self.instance.id, "Already registered");
            return Ok(());
        }

        self.registry.register(&self.instance).await?;
        *state = RegistrationState::Registered;

        info!(
            service = %self.instance.name,
            instance_id = %self.instance.id,
            address = %self.instance.address,
            port = self.instance.port,
            "Registered with service registry"
        );
        Ok(())
    }

    /// Deregister the instance, best effort.
    ///
    /// A registry failure is logged and returned but the registrar still
    /// moves to Unregistered; nothing is retried.
    pub async fn deregister(&self) -> QuestResult<()> {
        let mut state = self.state.lock().await;
        if *state == RegistrationState::Unregistered {
            debug!(instance_id = %self.instance.id, "Not registered, nothing to release");
            return Ok(());
        }
        *state = RegistrationState::Unregistered;

        match self.registry.deregister(&self.instance.id).await {
            Ok(()) => {
                info!(
                    service = %self.instance.name,
                    instance_id = %self.instance.id,
                    "Deregistered from service registry"
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    instance_id = %self.instance.id,
                    error = %e,
                    "Deregistration failed, leaving stale entry to the registry"
                );
                Err(e)
            }
        }
    }
}

impl Drop for InstanceRegistrar {
    fn drop(&mut self) {
        if *self.state.get_mut() != RegistrationState::Registered {
            return;
        }

        let instance_id = self.instance.id.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!(instance_id = %instance_id, "Registrar dropped while registered, releasing");
                let registry = self.registry.clone();
                handle.spawn(async move {
                    if let Err(e) = registry.deregister(&instance_id).await {
                        warn!(instance_id = %instance_id, error = %e, "Release on drop failed");
                    }
                });
            }
            Err(_) => {
                warn!(
                    instance_id = %instance_id,
                    "Registrar dropped outside a runtime, registration left to the registry"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use quest_core::QuestError;

    use super::*;
    use crate::MemoryRegistry;

    /// Registry that counts calls and can be told to fail
    #[derive(Default)]
    struct CountingRegistry {
        inner: MemoryRegistry,
        registers: AtomicUsize,
        deregisters: AtomicUsize,
    }

    #[async_trait]
    impl RegistryClient for CountingRegistry {
        async fn register(&self, instance: &ServiceInstance) -> QuestResult<()> {
            self.registers.fetch_add(1, Ordering::SeqCst);
            self.inner.register(instance).await
        }

        async fn deregister(&self, instance_id: &str) -> QuestResult<()> {
            self.deregisters.fetch_add(1, Ordering::SeqCst);
            self.inner.deregister(instance_id).await
        }

        async fn lookup(&self, name: &str) -> QuestResult<Vec<ServiceInstance>> {
            self.inner.lookup(name).await
        }
    }

    fn catalog_instance() -> ServiceInstance {
        ServiceInstance::new("quest-catalog", "quest-catalog-1", "127.0.0.1", 5001)
    }

    #[tokio::test]
    async fn test_register_then_deregister() {
        let registry = Arc::new(MemoryRegistry::new());
        let registrar = InstanceRegistrar::new(registry.clone(), catalog_instance());

        registrar.register().await.unwrap();
        assert_eq!(registrar.state().await, RegistrationState::Registered);
        assert!(registry.contains("quest-catalog-1"));

        registrar.deregister().await.unwrap();
        assert_eq!(registrar.state().await, RegistrationState::Unregistered);
        assert!(!registry.contains("quest-catalog-1"));
    }

    #[tokio::test]
    async fn test_register_failure_stays_unregistered() {
        let registry = Arc::new(MemoryRegistry::new());
        registry.set_available(false);
        let registrar = InstanceRegistrar::new(registry.clone(), catalog_instance());

        let err = registrar.register().await.unwrap_err();
        assert!(matches!(err, QuestError::RegistryUnavailable(_)));
        assert_eq!(registrar.state().await, RegistrationState::Unregistered);
    }

    #[tokio::test]
    async fn test_register_twice_calls_registry_once() {
        let registry = Arc::new(CountingRegistry::default());
        let registrar = InstanceRegistrar::new(registry.clone(), catalog_instance());

        registrar.register().await.unwrap();
        registrar.register().await.unwrap();
        assert_eq!(registry.registers.load(Ordering::SeqCst), 1);
        registrar.deregister().await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_deregister_is_noop() {
        let registry = Arc::new(CountingRegistry::default());
        let registrar = InstanceRegistrar::new(registry.clone(), catalog_instance());

        registrar.register().await.unwrap();
        registrar.deregister().await.unwrap();
        registrar.deregister().await.unwrap();
        assert_eq!(registry.deregisters.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_deregister_failure_is_reported_once() {
        let registry = Arc::new(CountingRegistry::default());
        let registrar = InstanceRegistrar::new(registry.clone(), catalog_instance());
        registrar.register().await.unwrap();

        registry.inner.set_available(false);
        assert!(registrar.deregister().await.is_err());
        assert_eq!(registrar.state().await, RegistrationState::Unregistered);

        // Second shutdown signal: no retry, no error
        assert!(registrar.deregister().await.is_ok());
        assert_eq!(registry.deregisters.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_releases_registration() {
        let registry = Arc::new(MemoryRegistry::new());
        let registrar = InstanceRegistrar::new(registry.clone(), catalog_instance());
        registrar.register().await.unwrap();

        drop(registrar);

        for _ in 0..50 {
            if !registry.contains("quest-catalog-1") {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!registry.contains("quest-catalog-1"));
    }

    #[tokio::test]
    async fn test_drop_after_deregister_does_nothing() {
        let registry = Arc::new(CountingRegistry::default());
        let registrar = InstanceRegistrar::new(registry.clone(), catalog_instance());
        registrar.register().await.unwrap();
        registrar.deregister().await.unwrap();

        drop(registrar);
        tokio::task::yield_now().await;
        assert_eq!(registry.deregisters.load(Ordering::SeqCst), 1);
    }
}
