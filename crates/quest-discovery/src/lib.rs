//! quest-discovery - Service registration and resolution
//!
//! Binds backend instances to logical names in a shared registry and turns
//! those names back into endpoints for the gateway.
//!
//! # Architecture
//!
//! ```text
//!   backend process                         gateway process
//!  ┌──────────────────────┐               ┌──────────────────────┐
//!  │  InstanceRegistrar   │               │   ServiceResolver    │
//!  │  register/deregister │               │   lookup → Endpoint  │
//!  └──────────┬───────────┘               └──────────┬───────────┘
//!             │         dyn RegistryClient           │
//!             ▼                                      ▼
//!  ┌──────────────────────────────────────────────────────────────┐
//!  │   ConsulRegistry (HTTP agent API)  |  MemoryRegistry (tests) │
//!  └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quest_discovery::{ConsulRegistry, InstanceRegistrar, ServiceResolver};
//! use quest_core::ServiceInstance;
//!
//! let registry = Arc::new(ConsulRegistry::new("http://localhost:8500")?);
//!
//! let instance = ServiceInstance::new("quest-catalog", "quest-catalog-1", "localhost", 5001);
//! let registrar = InstanceRegistrar::new(registry.clone(), instance);
//! registrar.register().await?;
//!
//! let endpoint = ServiceResolver::new(registry).resolve("quest-catalog").await?;
//! ```

pub mod config;
mod consul;
mod memory;
mod registrar;
mod registry;
mod resolver;
pub mod testing;

pub use config::{HealthCheckConfig, RegistrationConfig, RegistryConfig};
pub use consul::{AgentService, AgentServiceCheck, AgentServiceRegistration, ConsulRegistry};
pub use memory::MemoryRegistry;
pub use registrar::{InstanceRegistrar, RegistrationState};
pub use registry::RegistryClient;
pub use resolver::ServiceResolver;

// Re-export core types for convenience
pub use quest_core::{Endpoint, QuestError, QuestResult, ServiceInstance};
