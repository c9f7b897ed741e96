//! quest-gateway - Quest and review aggregation
//!
//! Resolves the catalog and review backends by logical name, fetches both
//! record sets concurrently and attaches each quest's reviews to it.
//!
//! # Architecture
//!
//! ```text
//!                      Aggregator::aggregate()
//!                 ┌────────────┴────────────┐
//!                 │        try_join!        │
//!                 ▼                         ▼
//!   resolve("quest-catalog")        resolve("quest-review")
//!   fetch::<Quest>("/quests")       fetch::<QuestReview>("/reviews")
//!                 │                         │
//!                 └────────────┬────────────┘
//!                              ▼
//!                 join_reviews(quests, reviews)
//!                              │
//!                              ▼
//!                    Vec<AggregatedQuest>
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quest_client::ServiceClient;
//! use quest_discovery::{ConsulRegistry, ServiceResolver};
//! use quest_gateway::Aggregator;
//!
//! let registry = Arc::new(ConsulRegistry::new("http://localhost:8500")?);
//! let aggregator = Aggregator::new(ServiceResolver::new(registry), ServiceClient::new()?);
//!
//! let quests = aggregator.aggregate().await?;
//! ```

mod aggregator;
mod join;

pub use aggregator::{Aggregator, RouteConfig};
pub use join::{join_reviews, Joined};

// Re-export core types for convenience
pub use quest_core::{AggregatedQuest, Quest, QuestError, QuestResult, QuestReview};
