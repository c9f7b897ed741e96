//! Shared data models for the quest services

mod instance;
mod quest;

pub use instance::*;
pub use quest::*;
