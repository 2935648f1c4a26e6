//! Error types for the calorie engine and the backend client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by the calorie computation core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalorieError {
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
}

/// Errors surfaced by the joined dashboard reads.
///
/// Any failing read collapses into one undifferentiated variant; the detail is
/// kept for logging only.
#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("failed to load calorie balance")]
    UpstreamFetch(String),
}

impl BalanceError {
    pub fn detail(&self) -> &str {
        match self {
            BalanceError::UpstreamFetch(detail) => detail,
        }
    }
}

/// HTTP-level errors from individual backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ApiError {
    pub fn from_status(status: StatusCode, message: String) -> Self {
        let msg = if message.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        } else {
            message
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(msg),
            StatusCode::NOT_FOUND => ApiError::NotFound(msg),
            status if status.is_server_error() => ApiError::ServerError(msg),
            status if status.is_client_error() => ApiError::BadRequest(msg),
            _ => ApiError::Unknown(msg),
        }
    }
}
