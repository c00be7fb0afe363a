//! Error types exposed by the OpenStreetMap API client.

use thiserror::Error;

/// Errors surfaced while calling the OpenStreetMap API.
///
/// The queue processor treats every variant as transient and retries; callers
/// outside the processor (login bootstrap, changeset listing) propagate them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The HTTP client could not be constructed.
    #[error("failed to configure HTTP client: {message}")]
    Client {
        /// Builder error detail.
        message: String,
    },

    /// The API base URL or a request path was invalid.
    #[error("invalid API URL: {message}")]
    InvalidUrl {
        /// URL parse error detail.
        message: String,
    },

    /// The API answered with a non-2xx status.
    #[error("API returned {status} {status_text}")]
    Status {
        /// Numeric HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status, if any.
        status_text: String,
    },

    /// Networking failed before a response was received.
    #[error("network error: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The response body could not be decoded as the expected JSON shape.
    #[error("failed to decode API response: {message}")]
    Decode {
        /// Deserialization error detail.
        message: String,
    },
}

impl ApiError {
    pub(crate) fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode {
                message: error.to_string(),
            }
        } else {
            Self::Network {
                message: error.to_string(),
            }
        }
    }
}
