//! Error types for the records client.

use hemocare_core::GatewayError;
use thiserror::Error;

/// Errors surfaced by the REST client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Could not connect to {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Response decoding failed: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ApiError> for GatewayError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http { status, body } => GatewayError::Rejected {
                status,
                detail: body,
            },
            other => GatewayError::Transport(other.to_string()),
        }
    }
}
