//! quest-api - HTTP layer for the quest services
//!
//! Routers for the two record backends and the gateway, the error mapping
//! that turns every failure into one JSON error body, and the host lifecycle
//! that keeps a backend registered exactly while it serves.
//!
//! # Usage
//!
//! ```ignore
//! use quest_api::{resource_router, serve_registered, shutdown_signal};
//! use quest_core::{StaticProvider, QUESTS_PATH};
//!
//! let router = resource_router(QUESTS_PATH, Arc::new(StaticProvider::new(quests)));
//! serve_registered(listener, router, registrar, shutdown_signal()).await?;
//! ```

pub mod args;
pub mod config;
pub mod error;
pub mod handlers;
pub mod host;
pub mod state;
pub mod telemetry;

pub use args::BackendArgs;
pub use config::BackendConfig;
pub use error::ApiError;
pub use host::{run_backend, serve_registered, shutdown_signal, HostError};
pub use state::{GatewayState, ResourceState};
pub use telemetry::init_tracing;

use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::routing::get;
use axum::{BoxError, Router};
use quest_core::{ResourceProvider, QUESTS_REVIEWS_PATH};
use quest_gateway::Aggregator;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Router for a backend serving one read-only collection at `path`
pub fn resource_router<T>(path: &str, provider: Arc<dyn ResourceProvider<T>>) -> Router
where
    T: Serialize + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(path, get(handlers::resources::list_records::<T>))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(ResourceState::new(provider))
}

/// Router for the gateway.
///
/// Requests running longer than `request_timeout` are answered with 504 and
/// their in-flight aggregation is dropped.
pub fn gateway_router(aggregator: Aggregator, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            QUESTS_REVIEWS_PATH,
            get(handlers::aggregate::list_quests_reviews),
        )
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(request_timeout),
        )
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(GatewayState::new(aggregator))
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::gateway_timeout("request timed out")
    } else {
        ApiError::internal(format!("unhandled middleware error: {}", err))
    }
}
