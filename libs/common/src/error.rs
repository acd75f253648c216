//! Custom error types for the common library
//!
//! This module defines the failures that can occur while talking to the
//! Graph API, independent of how the calling service reports them.

use thiserror::Error;

/// Custom error type for outbound Graph API calls
#[derive(Error, Debug)]
pub enum OutboundError {
    /// The request never produced a response (DNS, connect, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The Graph API answered with an error, either via status or an error object
    #[error("{message}")]
    Upstream {
        status: u16,
        message: String,
        code: Option<i64>,
    },

    /// A successful status carried a body that is not valid JSON
    #[error("Failed to parse Graph API response: {0}")]
    MalformedResponse(String),

    /// A successful, well-formed response lacked the field we asked for
    #[error("Graph API response is missing the '{0}' field")]
    MissingField(&'static str),

    /// The outbound request could not be built
    #[error("Failed to build Graph API request: {0}")]
    InvalidRequest(String),
}

impl OutboundError {
    /// Whether the Graph API explicitly blamed the caller's input.
    ///
    /// That is the case when it answered with a 4xx status and a structured
    /// error object carrying an error code.
    pub fn is_client_fault(&self) -> bool {
        match self {
            OutboundError::Upstream { status, code, .. } => {
                (400..500).contains(status) && code.is_some()
            }
            _ => false,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, OutboundError::Transport(_))
    }
}

impl From<reqwest::Error> for OutboundError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            OutboundError::InvalidRequest(err.to_string())
        } else {
            OutboundError::Transport(err.to_string())
        }
    }
}

/// Type alias for Result with OutboundError
pub type OutboundResult<T> = Result<T, OutboundError>;
