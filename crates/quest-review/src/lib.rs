//! Quest review backend
//!
//! Serves player reviews at `/reviews` and keeps itself registered as
//! `quest-review` while running. Reviews are not checked against the catalog.

use clap::Parser;
use quest_api::{BackendArgs, BackendConfig};
use quest_core::{QuestResult, QuestReview, REVIEW_SERVICE};
use quest_discovery::RegistrationConfig;

pub const DEFAULT_PORT: u16 = 5002;

/// Built-in reviews served when the config file carries no records
pub fn seed_reviews() -> Vec<QuestReview> {
    vec![
        QuestReview::new(1, "Amazing adventure!", 5),
        QuestReview::new(1, "Too scary", 3),
        QuestReview::new(2, "Great puzzles", 4),
    ]
}

#[derive(Parser, Debug)]
#[command(name = "quest-review")]
#[command(about = "Quest review backend")]
pub struct Args {
    #[command(flatten)]
    pub backend: BackendArgs,
}

impl Args {
    /// Load the config file, if any, and apply command-line overrides
    pub fn load_config(&self) -> QuestResult<BackendConfig<QuestReview>> {
        self.backend
            .load_config(RegistrationConfig::new(REVIEW_SERVICE, "localhost", DEFAULT_PORT))
    }

    pub fn log_filter(&self) -> String {
        self.backend.log_filter("quest_review")
    }
}
