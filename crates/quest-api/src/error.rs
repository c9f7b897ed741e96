//! API error types and conversions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quest_core::QuestError;
use serde::Serialize;

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

/// Standard error response format
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    /// 504 Gateway Timeout
    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::GATEWAY_TIMEOUT,
            kind: "timeout",
            message: message.into(),
        }
    }

    /// 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind: "internal_error",
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log errors at appropriate levels
        if self.status.is_server_error() {
            tracing::error!(error = self.kind, message = %self.message, "API error");
        } else if self.status.is_client_error() {
            tracing::debug!(error = self.kind, message = %self.message, "API client error");
        }

        let body = Json(ErrorResponse {
            error: self.kind.to_string(),
            message: self.message,
        });

        (self.status, body).into_response()
    }
}

impl From<QuestError> for ApiError {
    fn from(err: QuestError) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
