//! Aggregator - resolves both backends and joins their records

use quest_client::ServiceClient;
use quest_core::{
    AggregatedQuest, Quest, QuestResult, QuestReview, CATALOG_SERVICE, QUESTS_PATH,
    REVIEWS_PATH, REVIEW_SERVICE,
};
use quest_discovery::ServiceResolver;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::join::join_reviews;

/// Where the aggregator finds its two record sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub catalog_service: String,
    pub catalog_path: String,
    pub review_service: String,
    pub review_path: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            catalog_service: CATALOG_SERVICE.to_string(),
            catalog_path: QUESTS_PATH.to_string(),
            review_service: REVIEW_SERVICE.to_string(),
            review_path: REVIEWS_PATH.to_string(),
        }
    }
}

/// Produces the joined quest list for one gateway request.
///
/// Holds no per-request state, so a single instance is shared by every
/// request handler. Nothing is cached: each call re-resolves both services.
#[derive(Clone)]
pub struct Aggregator {
    resolver: ServiceResolver,
    client: ServiceClient,
    routes: RouteConfig,
}

impl Aggregator {
    /// Create an aggregator using the default routes
    pub fn new(resolver: ServiceResolver, client: ServiceClient) -> Self {
        Self {
            resolver,
            client,
            routes: RouteConfig::default(),
        }
    }

    /// Override the service names and paths
    pub fn with_routes(mut self, routes: RouteConfig) -> Self {
        self.routes = routes;
        self
    }

    pub fn routes(&self) -> &RouteConfig {
        &self.routes
    }

    /// Fetch quests and reviews concurrently and join them.
    ///
    /// Fails as a whole if either side fails; the other fetch is dropped.
    #[instrument(skip(self))]
    pub async fn aggregate(&self) -> QuestResult<Vec<AggregatedQuest>> {
        let (quests, reviews) = tokio::try_join!(
            self.fetch::<Quest>(&self.routes.catalog_service, &self.routes.catalog_path),
            self.fetch::<QuestReview>(&self.routes.review_service, &self.routes.review_path),
        )?;

        let joined = join_reviews(quests, reviews);
        if joined.orphaned_reviews > 0 {
            debug!(
                orphaned = joined.orphaned_reviews,
                "Dropped reviews that reference no known quest"
            );
        }

        Ok(joined.quests)
    }

    async fn fetch<T: DeserializeOwned>(&self, service: &str, path: &str) -> QuestResult<Vec<T>> {
        let endpoint = self.resolver.resolve(service).await?;
        let records = self.client.fetch::<T>(&endpoint, path).await?;
        debug!(service = %service, endpoint = %endpoint, count = records.len(), "Fetched records");
        Ok(records)
    }
}
