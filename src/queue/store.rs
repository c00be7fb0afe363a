//! The job queue and its persistence sinks.

use std::collections::VecDeque;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::osm::ChangesetId;

use super::error::QueueError;

/// Ordered queue of changeset ids awaiting the comment operation.
///
/// Serializes transparently as a JSON array of integers, so the on-disk form
/// is the literal remaining queue (e.g. `[418117,418116]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobQueue(VecDeque<ChangesetId>);

impl JobQueue {
    /// Builds a queue from ids in processing order.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = ChangesetId>) -> Self {
        Self(ids.into_iter().collect())
    }

    /// Parses an inline comma-separated id list (whitespace tolerated).
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidId`] for any entry that is not a positive
    /// integer.
    pub fn parse_inline(list: &str) -> Result<Self, QueueError> {
        let mut ids = VecDeque::new();
        for entry in list.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let value: u64 = entry.parse().map_err(|error| QueueError::InvalidId {
                value: entry.to_owned(),
                message: format!("{error}"),
            })?;
            let id = ChangesetId::new(value).map_err(|error| QueueError::InvalidId {
                value: entry.to_owned(),
                message: error.to_string(),
            })?;
            ids.push_back(id);
        }
        Ok(Self(ids))
    }

    /// Loads a queue from a JSON array file.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Io`] when the file cannot be read and
    /// [`QueueError::Malformed`] when it is not an array of positive
    /// integers.
    pub fn load(path: &Utf8Path) -> Result<Self, QueueError> {
        let raw = fs::read_to_string(path).map_err(|error| QueueError::Io {
            path: path.to_owned(),
            message: error.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|error| QueueError::Malformed {
            path: path.to_owned(),
            message: error.to_string(),
        })
    }

    /// Returns the next item without removing it.
    #[must_use]
    pub fn front(&self) -> Option<ChangesetId> {
        self.0.front().copied()
    }

    /// Removes and returns the front item.
    pub fn pop_front(&mut self) -> Option<ChangesetId> {
        self.0.pop_front()
    }

    /// Number of items still queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the queue is drained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the remaining ids in order.
    pub fn ids(&self) -> impl Iterator<Item = ChangesetId> + '_ {
        self.0.iter().copied()
    }
}

/// Persistence boundary invoked after every confirmed item.
pub trait QueueSink: Send + Sync {
    /// Persists the remaining queue.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError`] when the queue cannot be written; the processor
    /// treats this as fatal since losing the resume point is worse than
    /// stopping.
    fn persist(&self, queue: &JobQueue) -> Result<(), QueueError>;
}

/// Sink that rewrites the queue file wholesale via write-then-rename.
///
/// The rename keeps a crash from leaving a half-written resume file; the
/// observable contract is still a plain whole-file rewrite.
#[derive(Debug, Clone)]
pub struct FileQueueSink {
    path: Utf8PathBuf,
}

impl FileQueueSink {
    /// Creates a sink writing to the given queue file.
    #[must_use]
    pub const fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl QueueSink for FileQueueSink {
    fn persist(&self, queue: &JobQueue) -> Result<(), QueueError> {
        let json = serde_json::to_string(queue).map_err(|error| QueueError::Io {
            path: self.path.clone(),
            message: error.to_string(),
        })?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, json).map_err(|error| QueueError::Io {
            path: staging.clone(),
            message: error.to_string(),
        })?;
        fs::rename(&staging, &self.path).map_err(|error| QueueError::Io {
            path: self.path.clone(),
            message: error.to_string(),
        })
    }
}

/// Sink for ephemeral inline queues: persists nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullQueueSink;

impl QueueSink for NullQueueSink {
    fn persist(&self, _queue: &JobQueue) -> Result<(), QueueError> {
        Ok(())
    }
}
