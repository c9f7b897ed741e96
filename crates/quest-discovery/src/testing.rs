//! Test utilities for quest-discovery
//!
//! Serves the subset of the Consul agent API the `ConsulRegistry` uses,
//! backed by a `MemoryRegistry`, so tests can exercise the real HTTP client
//! without a Consul install.
//!
//! ```ignore
//! use quest_client::testing::TestServer;
//! use quest_discovery::{testing::consul_agent_router, ConsulRegistry, MemoryRegistry};
//!
//! let store = Arc::new(MemoryRegistry::new());
//! let agent = TestServer::start(consul_agent_router(store.clone())).await?;
//! let registry = ConsulRegistry::new(&agent.base_url())?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::consul::{AgentService, AgentServiceRegistration};
use crate::memory::MemoryRegistry;
use crate::registry::RegistryClient;

/// Router that mimics the Consul agent service endpoints
pub fn consul_agent_router(registry: Arc<MemoryRegistry>) -> Router {
    Router::new()
        .route("/v1/agent/service/register", put(register))
        .route("/v1/agent/service/deregister/{id}", put(deregister))
        .route("/v1/agent/services", get(services))
        .with_state(registry)
}

fn agent_down() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "agent unavailable").into_response()
}

async fn register(
    State(registry): State<Arc<MemoryRegistry>>,
    Json(body): Json<AgentServiceRegistration>,
) -> Response {
    match registry.register(&body.into_instance()).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(_) => agent_down(),
    }
}

async fn deregister(
    State(registry): State<Arc<MemoryRegistry>>,
    Path(id): Path<String>,
) -> Response {
    if !registry.is_available() {
        return agent_down();
    }
    if !registry.contains(&id) {
        return (
            StatusCode::NOT_FOUND,
            format!("Unknown service ID {:?}", id),
        )
            .into_response();
    }
    match registry.deregister(&id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(_) => agent_down(),
    }
}

async fn services(State(registry): State<Arc<MemoryRegistry>>) -> Response {
    if !registry.is_available() {
        return agent_down();
    }
    let services: BTreeMap<String, AgentService> = registry
        .all()
        .into_iter()
        .map(|i| {
            (
                i.id.clone(),
                AgentService {
                    id: i.id,
                    service: i.name,
                    address: i.address,
                    port: i.port,
                    tags: Some(i.tags.into_iter().collect()),
                },
            )
        })
        .collect();
    Json(services).into_response()
}
