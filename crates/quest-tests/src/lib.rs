//! End-to-end harness for the quest services
//!
//! Everything runs in-process on ephemeral ports:
//! - a mock Consul agent backed by a `MemoryRegistry`
//! - backends served through `serve_registered`, registering over HTTP
//! - the gateway router from `quest-gatewayd`
//!
//! # Test Structure
//!
//! - `e2e_test.rs` - gateway responses for the healthy and failing meshes
//! - `lifecycle_test.rs` - registration across backend start and stop

use std::sync::Arc;
use std::time::Duration;

use quest_api::{resource_router, serve_registered, HostError};
use quest_client::testing::{wait_for, TestServer};
use quest_core::{QuestResult, ServiceInstance, StaticProvider};
use quest_discovery::testing::consul_agent_router;
use quest_discovery::{
    ConsulRegistry, InstanceRegistrar, MemoryRegistry, RegistrationConfig, RegistryClient,
};
use quest_gatewayd::{build_router_with, GatewayConfig};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// How long helpers wait for registration state to settle
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

/// Mock Consul agent plus direct access to its store
pub struct Agent {
    pub store: Arc<MemoryRegistry>,
    pub server: TestServer,
}

impl Agent {
    pub async fn start() -> Self {
        let store = Arc::new(MemoryRegistry::new());
        let server = TestServer::start(consul_agent_router(store.clone()))
            .await
            .expect("start mock agent");
        Self { store, server }
    }

    pub fn address(&self) -> String {
        self.server.base_url()
    }

    /// A Consul client talking to this agent
    pub fn client(&self) -> Arc<dyn RegistryClient> {
        Arc::new(ConsulRegistry::new(&self.address()).expect("agent address"))
    }

    /// Wait until `instance_id` is (or is no longer) registered
    pub async fn wait_registered(&self, instance_id: &str, registered: bool) -> bool {
        let store = self.store.clone();
        let id = instance_id.to_string();
        wait_for(
            move || {
                let store = store.clone();
                let id = id.clone();
                async move { store.contains(&id) == registered }
            },
            SETTLE_TIMEOUT,
        )
        .await
    }
}

/// A backend served and registered exactly like the binaries do
pub struct Backend {
    pub instance: ServiceInstance,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<Result<(), HostError>>>,
}

impl Backend {
    pub async fn start<T>(agent: &Agent, name: &str, id: &str, path: &str, records: Vec<T>) -> Self
    where
        T: Serialize + Clone + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind backend");
        let port = listener.local_addr().expect("local addr").port();

        let mut registration = RegistrationConfig::new(name, "127.0.0.1", port);
        registration.id = Some(id.to_string());
        let instance = registration.to_instance().expect("valid registration");

        let registrar = InstanceRegistrar::new(agent.client(), instance.clone());
        let router = resource_router(path, Arc::new(StaticProvider::new(records)));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve_registered(listener, router, registrar, async {
            let _ = shutdown_rx.await;
        }));

        assert!(
            agent.wait_registered(id, true).await,
            "{} never registered",
            id
        );

        Self {
            instance,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Trigger graceful shutdown and wait for the host to finish
    pub async fn stop(mut self) -> Result<(), HostError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.await.expect("backend task panicked"),
            None => Ok(()),
        }
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// The gateway, resolving through `registry`
pub async fn start_gateway(
    registry: Arc<dyn RegistryClient>,
    request_timeout_secs: u64,
) -> QuestResult<TestServer> {
    let config = GatewayConfig {
        request_timeout_secs,
        ..GatewayConfig::default()
    };
    let router = build_router_with(&config, registry)?;
    Ok(TestServer::start(router).await.expect("start gateway"))
}

/// GET `path` on `server`, returning status and JSON body
pub async fn get_json(server: &TestServer, path: &str) -> (u16, serde_json::Value) {
    let response = server
        .client
        .http_client()
        .get(format!("{}{}", server.base_url(), path))
        .send()
        .await
        .expect("request sent");
    let status = response.status().as_u16();
    let body = response.json().await.expect("JSON body");
    (status, body)
}
