//! Durable job-queue processing for changeset comments.
//!
//! The queue is the sole durable state of a batch run: an ordered list of
//! changeset ids persisted as a JSON array. Items are processed strictly in
//! order, each with an idempotency pre-check, and the remaining queue is
//! rewritten after every confirmed item so the file on disk is always an
//! exact resume point.

pub mod error;
pub mod processor;
pub mod retry;
pub mod store;

pub use error::QueueError;
pub use processor::{CommentOutcome, DEFAULT_REQUEST_INTERVAL, Processor};
pub use retry::{Backoff, DEFAULT_ERROR_SLEEP, RetryPolicy};
pub use store::{FileQueueSink, JobQueue, NullQueueSink, QueueSink};
