//! Application state for the quest routers

use std::sync::Arc;

use quest_core::ResourceProvider;
use quest_gateway::Aggregator;

/// State of a backend router: the provider behind its one collection
pub struct ResourceState<T> {
    pub provider: Arc<dyn ResourceProvider<T>>,
}

impl<T> ResourceState<T> {
    pub fn new(provider: Arc<dyn ResourceProvider<T>>) -> Self {
        Self { provider }
    }
}

// Manual impl: the derive would require `T: Clone`
impl<T> Clone for ResourceState<T> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

/// State of the gateway router
#[derive(Clone)]
pub struct GatewayState {
    pub aggregator: Arc<Aggregator>,
}

impl GatewayState {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}
