//! The sequential, resumable queue processor.

use std::time::Duration;

use tracing::{error, info};

use crate::osm::{ApiError, ChangesetId, OsmGateway};

use super::error::QueueError;
use super::retry::RetryPolicy;
use super::store::{JobQueue, QueueSink};

/// Default courtesy delay between items (not between retries).
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// How one item was confirmed done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentOutcome {
    /// The comment text was already present in the discussion.
    AlreadyExists,
    /// The comment was posted now.
    Added,
}

/// Drives the durable queue: one item at a time, in order, forever-retrying.
///
/// Every failure from the gateway is treated as transient. A changeset that
/// legitimately does not exist retries just like an outage; distinguishing
/// the two is a known limitation, left as-is on purpose.
pub struct Processor<'gateway, Gateway>
where
    Gateway: OsmGateway + ?Sized,
{
    gateway: &'gateway Gateway,
    policy: RetryPolicy,
    request_interval: Duration,
}

impl<'gateway, Gateway> Processor<'gateway, Gateway>
where
    Gateway: OsmGateway + ?Sized,
{
    /// Creates a processor with the default backoff and request interval.
    #[must_use]
    pub fn new(gateway: &'gateway Gateway) -> Self {
        Self {
            gateway,
            policy: RetryPolicy::default(),
            request_interval: DEFAULT_REQUEST_INTERVAL,
        }
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the inter-item rate-limit delay.
    #[must_use]
    pub const fn with_request_interval(mut self, request_interval: Duration) -> Self {
        self.request_interval = request_interval;
        self
    }

    /// Processes the queue to completion.
    ///
    /// Items run in strict FIFO order. Each item is confirmed (pre-existing
    /// comment detected, or comment posted), then popped, then the shortened
    /// queue is persisted, and only then does the next item start after the
    /// rate-limit delay. A crash at any point leaves the persisted queue as
    /// the exact resume point.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError`] only when persisting the queue fails; remote
    /// failures are retried indefinitely and never escape.
    pub async fn process(
        &self,
        queue: &mut JobQueue,
        comment: &str,
        sink: &dyn QueueSink,
    ) -> Result<(), QueueError> {
        info!("Processing {} items in the queue...", queue.len());

        while let Some(changeset) = queue.front() {
            self.ensure_comment(changeset, comment).await;

            queue.pop_front();
            sink.persist(queue)?;

            if !queue.is_empty() {
                tokio::time::sleep(self.request_interval).await;
            }
        }

        info!("All done");
        Ok(())
    }

    /// Retries one item until its comment is confirmed, backing off on
    /// failure.
    async fn ensure_comment(&self, changeset: ChangesetId, comment: &str) {
        let mut backoff = self.policy.delays();
        loop {
            match self.create_comment(changeset, comment).await {
                Ok(CommentOutcome::AlreadyExists) => {
                    info!("{changeset}: comment already exists");
                    return;
                }
                Ok(CommentOutcome::Added) => {
                    info!("{changeset}: comment was added");
                    return;
                }
                Err(failure) => {
                    let delay = backoff.next_delay();
                    error!("{changeset}: failed to add comment: {failure}");
                    info!("Sleeping for {} sec...", delay.as_secs());
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// One attempt: pre-check the discussion, then post only when absent.
    ///
    /// Re-evaluating the pre-check on every attempt is what makes the
    /// non-idempotent POST safe to retry and the item safe to re-run after a
    /// resume.
    async fn create_comment(
        &self,
        changeset: ChangesetId,
        comment: &str,
    ) -> Result<CommentOutcome, ApiError> {
        let existing = self.gateway.changeset_comments(changeset).await?;
        if existing.iter().any(|entry| entry.text == comment) {
            return Ok(CommentOutcome::AlreadyExists);
        }
        self.gateway.add_comment(changeset, comment).await?;
        Ok(CommentOutcome::Added)
    }
}
