//! Quest catalog backend
//!
//! Serves the quest catalog at `/quests` and keeps itself registered as
//! `quest-catalog` while running.

use clap::Parser;
use quest_api::{BackendArgs, BackendConfig};
use quest_core::{Quest, QuestResult, CATALOG_SERVICE};
use quest_discovery::RegistrationConfig;

/// Port used when neither the config file nor the command line sets one
pub const DEFAULT_PORT: u16 = 5001;

/// Built-in catalog served when the config file carries no records
pub fn seed_quests() -> Vec<Quest> {
    vec![
        Quest::new(1, "Haunted Mansion", "Find the hidden treasure"),
        Quest::new(2, "Pirate Treasure Hunt", "Escape the haunted house"),
    ]
}

#[derive(Parser, Debug)]
#[command(name = "quest-catalog")]
#[command(about = "Quest catalog backend")]
pub struct Args {
    #[command(flatten)]
    pub backend: BackendArgs,
}

impl Args {
    /// Load the config file, if any, and apply command-line overrides
    pub fn load_config(&self) -> QuestResult<BackendConfig<Quest>> {
        self.backend
            .load_config(RegistrationConfig::new(CATALOG_SERVICE, "localhost", DEFAULT_PORT))
    }

    pub fn log_filter(&self) -> String {
        self.backend.log_filter("quest_catalog")
    }
}
