//! Top-level error type and process exit-code mapping.

use thiserror::Error;

use crate::auth::AuthError;
use crate::credentials::CredentialError;
use crate::osm::ApiError;
use crate::queue::QueueError;

/// Exit code for missing or unusable command-line arguments.
pub const EXIT_USAGE: u8 = 1;

/// Exit code for an empty or unreadable comment source.
pub const EXIT_BAD_COMMENT: u8 = 2;

/// Exit code for every other fatal error (auth, I/O, configuration).
pub const EXIT_FAILURE: u8 = 10;

/// Errors that terminate the process before or outside queue processing.
///
/// Transient API failures never appear here: the queue processor retries them
/// internally and only surfaces local persistence failures.
#[derive(Debug, Error)]
pub enum HeckleError {
    /// Required arguments were not supplied.
    #[error("{message}")]
    Usage {
        /// Human-readable description of the missing argument.
        message: String,
    },

    /// The comment source resolved to an empty or unreadable comment.
    #[error("comment source is empty or invalid: {message}")]
    BadComment {
        /// Details about the comment source failure.
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The OAuth2 login attempt failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A remote call failed outside the retrying queue processor.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Queue loading or persistence failed.
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// The credential store could not be read or written.
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    /// A local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl HeckleError {
    /// Maps the error to the process exit code documented for the CLI.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Usage { .. } => EXIT_USAGE,
            Self::BadComment { .. } => EXIT_BAD_COMMENT,
            _ => EXIT_FAILURE,
        }
    }
}
