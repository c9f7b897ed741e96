//! Backend host lifecycle
//!
//! ```text
//!   register ──► serve ──► shutdown signal ──► deregister ──► drain
//!      │           │
//!      └─ fail: exit └─ server error: still deregister
//! ```

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use quest_core::{QuestError, StaticProvider};
use quest_discovery::{InstanceRegistrar, RegistryClient};
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::BackendConfig;
use crate::resource_router;

/// Errors that end a backend process
#[derive(Debug, Error)]
pub enum HostError {
    /// Configuration, registry or registration failure
    #[error(transparent)]
    Quest(#[from] QuestError),

    /// Listener or server failure
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serve `router` on `listener` while registered.
///
/// Registration happens before the first request is accepted; if it fails
/// nothing is served and the error is returned. The shutdown signal
/// deregisters the instance before in-flight requests are drained, so the
/// registry stops advertising it as soon as it stops accepting connections.
/// If the server stops with an error instead, deregistration happens then.
/// A failed deregistration is logged by the registrar and does not turn into
/// an error here.
pub async fn serve_registered<F>(
    listener: TcpListener,
    router: Router,
    registrar: InstanceRegistrar,
    shutdown: F,
) -> Result<(), HostError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr()?;
    let registrar = Arc::new(registrar);
    registrar.register().await?;

    let instance = registrar.instance();
    info!(
        service = %instance.name,
        instance_id = %instance.id,
        addr = %local_addr,
        "Serving"
    );

    let on_shutdown = {
        let registrar = registrar.clone();
        async move {
            shutdown.await;
            info!("Deregistering before draining connections");
            let _ = registrar.deregister().await;
        }
    };

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(on_shutdown)
        .await;
    if let Err(e) = &served {
        error!(error = %e, "Server stopped with error");
    }

    let _ = registrar.deregister().await;
    served?;

    info!("Shutdown complete");
    Ok(())
}

/// Run a record backend from its configuration.
///
/// Serves `config.records` when present and `seed` otherwise, bound to the
/// configured listen address and registered under the configured name.
pub async fn run_backend<T, F>(
    config: BackendConfig<T>,
    path: &str,
    seed: Vec<T>,
    shutdown: F,
) -> Result<(), HostError>
where
    T: Serialize + Clone + Send + Sync + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    config.validate()?;
    let instance = config.service.to_instance()?;
    let registry: Arc<dyn RegistryClient> = Arc::new(config.registry.connect()?);
    let bind_addr = config.service.bind_addr();

    let records = config.records.unwrap_or(seed);
    info!(count = records.len(), path = %path, "Loaded records");
    let router = resource_router(path, Arc::new(StaticProvider::new(records)));

    let listener = TcpListener::bind(bind_addr).await?;
    serve_registered(
        listener,
        router,
        InstanceRegistrar::new(registry, instance),
        shutdown,
    )
    .await
}

/// Completes on Ctrl-C or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Signal received, starting graceful shutdown");
}
