//! Backend configuration file
//!
//! ```toml
//! [service]
//! name = "quest-catalog"
//! host = "127.0.0.1"
//! port = 5001
//!
//! [registry]
//! address = "http://localhost:8500"
//!
//! [[records]]
//! id = 1
//! title = "Haunted Mansion"
//! description = "Find the hidden treasure"
//! ```

use std::path::Path;

use quest_core::{QuestError, QuestResult};
use quest_discovery::{RegistrationConfig, RegistryConfig};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Configuration of a record backend serving records of type `T`
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct BackendConfig<T> {
    /// Identity advertised to the registry
    pub service: RegistrationConfig,

    /// Registry connection
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Records to serve instead of the built-in seed data
    #[serde(default)]
    pub records: Option<Vec<T>>,
}

impl<T> BackendConfig<T> {
    /// Configuration with no file: defaults for everything but the identity
    pub fn new(service: RegistrationConfig) -> Self {
        Self {
            service,
            registry: RegistryConfig::default(),
            records: None,
        }
    }

    pub fn validate(&self) -> QuestResult<()> {
        self.service.validate()
    }
}

impl<T: DeserializeOwned> BackendConfig<T> {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> QuestResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            QuestError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> QuestResult<Self> {
        toml::from_str(content).map_err(|e| QuestError::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quest_core::{Quest, QuestReview};
    use std::io::Write;

    #[test]
    fn test_minimal_config() {
        let config: BackendConfig<Quest> = BackendConfig::from_toml(
            r#"
            [service]
            name = "quest-catalog"
            port = 5001
            "#,
        )
        .unwrap();

        assert_eq!(config.service.name, "quest-catalog");
        assert_eq!(config.service.host, "localhost");
        assert_eq!(config.registry.address, "http://localhost:8500");
        assert!(config.records.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config_with_records() {
        let config: BackendConfig<QuestReview> = BackendConfig::from_toml(
            r#"
            [service]
            name = "quest-review"
            id = "quest-review-7"
            host = "10.0.0.5"
            port = 5002
            tag = "urlprefix-/reviews"
            bind = "0.0.0.0:5002"

            [service.health_check]
            interval_secs = 5

            [registry]
            address = "http://consul:8500"
            timeout_secs = 2

            [[records]]
            questId = 1
            comment = "Amazing adventure!"
            rating = 5

            [[records]]
            questId = 2
            comment = "Great puzzles"
            rating = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.service.id.as_deref(), Some("quest-review-7"));
        assert_eq!(config.registry.timeout_secs, 2);
        let check = config.service.health_check.as_ref().unwrap();
        assert_eq!(check.interval_secs, 5);
        assert_eq!(check.path, "/health");
        assert_eq!(
            config.records.unwrap(),
            vec![
                QuestReview::new(1, "Amazing adventure!", 5),
                QuestReview::new(2, "Great puzzles", 4),
            ]
        );
    }

    #[test]
    fn test_missing_service_is_invalid() {
        let err = BackendConfig::<Quest>::from_toml("[registry]\naddress = \"x\"").unwrap_err();
        assert!(matches!(err, QuestError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_name_fails_validation() {
        let config: BackendConfig<Quest> = BackendConfig::from_toml(
            r#"
            [service]
            name = ""
            port = 5001
            "#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(QuestError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [service]
            name = "quest-catalog"
            port = 5001

            [[records]]
            id = 3
            title = "Lost Temple"
            description = "Decode the glyphs"
            "#
        )
        .unwrap();

        let config = BackendConfig::<Quest>::load(file.path()).unwrap();
        assert_eq!(
            config.records.unwrap(),
            vec![Quest::new(3, "Lost Temple", "Decode the glyphs")]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = BackendConfig::<Quest>::load("/nonexistent/quest-catalog.toml").unwrap_err();
        assert!(matches!(err, QuestError::InvalidConfig(_)));
    }
}
