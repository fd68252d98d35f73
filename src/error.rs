//! Failure taxonomy for API client operations.

use thiserror::Error;

/// Message used when a request was issued but no response arrived.
pub const NO_RESPONSE_MSG: &str =
    "No response from server. Please check your internet connection.";

/// Fallback message for a response that reports failure without saying why.
pub const UNKNOWN_ERROR_MSG: &str = "Unknown error";

/// Errors surfaced by client operations.
///
/// Every operation resolves to exactly one outcome: `Ok` with its payload or
/// one of these. All variants carry a human-readable message and callers
/// display them as-is; there is no retry and no structured detail beyond the
/// kind.
#[derive(Debug, Error)]
pub enum RagError {
    /// Bad or missing local input, detected before any request is issued.
    #[error("{0}")]
    Validation(String),

    /// The server responded, but the response reports failure: a non-2xx
    /// status, or a 2xx envelope without a truthy `success` flag.
    #[error("{0}")]
    Service(String),

    /// The request produced no usable response.
    #[error("{0}")]
    Transport(String),
}

impl RagError {
    /// Map a failed send to the transport policy: connect and timeout
    /// failures mean no response arrived and yield the fixed no-response
    /// message; anything else keeps the underlying description.
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            RagError::Transport(NO_RESPONSE_MSG.to_string())
        } else {
            RagError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_message_alone() {
        assert_eq!(
            RagError::Validation("Query text cannot be empty".into()).to_string(),
            "Query text cannot be empty"
        );
        assert_eq!(RagError::Service("X".into()).to_string(), "X");
        assert_eq!(
            RagError::Transport(NO_RESPONSE_MSG.into()).to_string(),
            NO_RESPONSE_MSG
        );
    }

    #[test]
    fn no_response_literal_is_stable() {
        // Displayed verbatim to users; tests elsewhere match on it.
        assert_eq!(
            NO_RESPONSE_MSG,
            "No response from server. Please check your internet connection."
        );
    }
}
