//! quest-core - Core traits and types for the quest services
//!
//! This crate holds the pieces every other crate agrees on: the record
//! shapes served by the backends, the registry's view of a running
//! instance, the error taxonomy shared by discovery and fetching, and the
//! `ResourceProvider` capability the backends serve from.

pub mod error;
pub mod models;
pub mod provider;

pub use error::{QuestError, QuestResult};
pub use models::*;
pub use provider::{ResourceProvider, StaticProvider};

/// Logical name of the catalog backend
pub const CATALOG_SERVICE: &str = "quest-catalog";
/// Logical name of the review backend
pub const REVIEW_SERVICE: &str = "quest-review";
/// Resource path served by the catalog backend
pub const QUESTS_PATH: &str = "/quests";
/// Resource path served by the review backend
pub const REVIEWS_PATH: &str = "/reviews";
/// Resource path served by the gateway
pub const QUESTS_REVIEWS_PATH: &str = "/quests-reviews";
