//! Error types for queue loading and persistence.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced by queue storage.
///
/// Remote failures never appear here: the processor swallows and retries
/// them. Only local persistence problems escape the run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueError {
    /// Reading or writing the queue file failed.
    #[error("queue file I/O failed at {path}: {message}")]
    Io {
        /// Queue file path.
        path: Utf8PathBuf,
        /// Underlying I/O error detail.
        message: String,
    },

    /// The queue file did not hold a JSON array of positive integers.
    #[error("queue file at {path} is malformed: {message}")]
    Malformed {
        /// Queue file path.
        path: Utf8PathBuf,
        /// Deserialization error detail.
        message: String,
    },

    /// An inline changeset list entry was not a positive integer.
    #[error("invalid changeset id '{value}': {message}")]
    InvalidId {
        /// The rejected list entry.
        value: String,
        /// Parse or validation error detail.
        message: String,
    },
}
