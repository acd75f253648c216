//! Custom error types for the publisher service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::OutboundError;
use serde_json::json;
use thiserror::Error;

use crate::schedule::ScheduleError;

/// Custom error type for the publisher service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed caller input
    #[error("{0}")]
    InvalidInput(String),

    /// The upload form is larger than the configured limit, in bytes
    #[error("Upload exceeds the maximum size of {0} bytes")]
    PayloadTooLarge(usize),

    /// The Graph API blamed the caller's input
    #[error("{0}")]
    UpstreamRejected(String),

    /// The Graph API failed or answered with something unusable
    #[error("{0}")]
    Upstream(String),

    /// The Graph API could not be reached
    #[error("{0}")]
    Transport(String),

    /// Anything else; the detail is logged, never returned
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    /// Map a token exchange failure, surfacing caller faults as 400
    pub fn from_token_exchange(err: OutboundError) -> Self {
        if err.is_client_fault() {
            ApiError::UpstreamRejected(err.to_string())
        } else {
            err.into()
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::UpstreamRejected(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upstream(_) | ApiError::Transport(_) | ApiError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<OutboundError> for ApiError {
    fn from(err: OutboundError) -> Self {
        match err {
            OutboundError::Transport(_) => ApiError::Transport(err.to_string()),
            OutboundError::InvalidRequest(_) => ApiError::Unexpected(err.to_string()),
            OutboundError::Upstream { .. }
            | OutboundError::MalformedResponse(_)
            | OutboundError::MissingField(_) => ApiError::Upstream(err.to_string()),
        }
    }
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            ApiError::Unexpected(detail) => {
                tracing::error!("Unexpected failure: {}", detail);
                "Internal server error".to_string()
            }
            ApiError::InvalidInput(msg) => msg,
            too_large @ ApiError::PayloadTooLarge(_) => too_large.to_string(),
            ApiError::UpstreamRejected(msg)
            | ApiError::Upstream(msg)
            | ApiError::Transport(msg) => {
                tracing::error!("Graph API call failed ({}): {}", status, msg);
                msg
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
