//! quest-client - Typed HTTP fetcher for quest backends
//!
//! Fetches a JSON array from a resolved endpoint and decodes it into typed
//! records. The gateway uses one shared `ServiceClient` for every backend.
//!
//! # Example
//!
//! ```rust,no_run
//! use quest_client::ServiceClient;
//! use quest_core::{Endpoint, Quest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ServiceClient::new()?;
//!     let endpoint = Endpoint::new("localhost", 5001);
//!
//!     let quests: Vec<Quest> = client.fetch(&endpoint, "/quests").await?;
//!     println!("{} quests", quests.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module runs any axum router on an ephemeral port:
//!
//! ```rust,ignore
//! use quest_client::testing::TestServer;
//!
//! let server = TestServer::start(router).await?;
//! let records: Vec<Quest> = server.client.fetch(&server.endpoint(), "/quests").await?;
//! ```

mod client;
mod error;
pub mod testing;

pub use client::ServiceClient;
pub use error::{ClientError, Result};

// Re-export core types for convenience
pub use quest_core::Endpoint;
