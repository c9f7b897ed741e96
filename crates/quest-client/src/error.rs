//! Error types for client operations

use quest_core::QuestError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while fetching from a backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Backend returned a non-success status
    #[error("Server error {status} from {url}")]
    ServerError { status: u16, url: String },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Timeout
    #[error("Request to {0} timed out")]
    Timeout(String),

    /// Connection failed
    #[error("Connection to {url} failed: {message}")]
    ConnectionFailed { url: String, message: String },
}

impl ClientError {
    /// Classify a reqwest send error for `url`
    pub fn transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(url.to_string())
        } else {
            Self::ConnectionFailed {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl From<ClientError> for QuestError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ServerError { status, url } => QuestError::Remote { status, url },
            ClientError::ParseError(msg) => QuestError::Decode(msg),
            ClientError::Timeout(url) => QuestError::Timeout(url),
            ClientError::ConnectionFailed { url, message } => {
                QuestError::Unreachable { url, message }
            }
            ClientError::InvalidUrl(e) => QuestError::Unreachable {
                url: String::new(),
                message: e.to_string(),
            },
            ClientError::HttpError(e) => QuestError::Unreachable {
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
                message: e.to_string(),
            },
            ClientError::IoError(e) => QuestError::Unreachable {
                url: String::new(),
                message: e.to_string(),
            },
        }
    }
}
