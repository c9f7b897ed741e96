//! Common error types for discovery and remote fetching

use thiserror::Error;

/// Result type for quest operations
pub type QuestResult<T> = Result<T, QuestError>;

/// Errors that can occur while registering, resolving or fetching
#[derive(Debug, Error)]
pub enum QuestError {
    /// Registry could not be reached (connect failure, timeout)
    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// Registry was reachable but refused the request
    #[error("Registry rejected request ({status}): {message}")]
    RegistryRejected {
        /// HTTP status returned by the registry
        status: u16,
        /// Body or reason returned by the registry
        message: String,
    },

    /// Lookup succeeded but no instance is registered under the name
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// Backend could not be reached
    #[error("Service unreachable at {url}: {message}")]
    Unreachable {
        /// URL that was requested
        url: String,
        /// Transport error description
        message: String,
    },

    /// Backend answered with a non-success status
    #[error("Remote error {status} from {url}")]
    Remote {
        /// HTTP status returned by the backend
        status: u16,
        /// URL that was requested
        url: String,
    },

    /// Backend body did not match the expected record shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Transport timed out talking to a backend
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Configuration rejected at startup
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl QuestError {
    /// Returns the HTTP status code for this error.
    ///
    /// Every kind maps to exactly one status so a gateway caller always
    /// receives a single, well-defined failure.
    pub fn status_code(&self) -> u16 {
        match self {
            QuestError::RegistryUnavailable(_) => 503,
            QuestError::RegistryRejected { .. } => 502,
            QuestError::ServiceNotFound(_) => 503,
            QuestError::Unreachable { .. } => 502,
            QuestError::Remote { .. } => 502,
            QuestError::Decode(_) => 502,
            QuestError::Timeout(_) => 504,
            QuestError::InvalidConfig(_) => 500,
        }
    }

    /// Short machine-readable code for this error kind
    pub fn kind(&self) -> &'static str {
        match self {
            QuestError::RegistryUnavailable(_) => "registry_unavailable",
            QuestError::RegistryRejected { .. } => "registry_rejected",
            QuestError::ServiceNotFound(_) => "service_not_found",
            QuestError::Unreachable { .. } => "service_unreachable",
            QuestError::Remote { .. } => "remote_error",
            QuestError::Decode(_) => "decode_error",
            QuestError::Timeout(_) => "timeout",
            QuestError::InvalidConfig(_) => "invalid_config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            QuestError::RegistryUnavailable("down".into()).status_code(),
            503
        );
        assert_eq!(
            QuestError::ServiceNotFound("quest-review".into()).status_code(),
            503
        );
        assert_eq!(
            QuestError::Remote {
                status: 500,
                url: "http://x".into()
            }
            .status_code(),
            502
        );
        assert_eq!(QuestError::Decode("bad".into()).status_code(), 502);
        assert_eq!(QuestError::Timeout("slow".into()).status_code(), 504);
    }

    #[test]
    fn test_display_names_service() {
        let err = QuestError::ServiceNotFound("quest-catalog".into());
        assert_eq!(err.to_string(), "Service not found: quest-catalog");
        assert_eq!(err.kind(), "service_not_found");
    }
}
