//! Injectable retry/backoff strategy for the per-item retry loop.

use std::time::Duration;

/// Default initial backoff unit (one minute).
pub const DEFAULT_ERROR_SLEEP: Duration = Duration::from_secs(60);

/// Exponential backoff policy: a starting delay doubled on every failure.
///
/// The default policy is uncapped and never gives up, matching the tool's
/// unattended-resilience intent; tests inject a small initial delay or a cap
/// to exercise bounded variants deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    initial: Duration,
    cap: Option<Duration>,
}

impl RetryPolicy {
    /// Creates an uncapped policy with the given initial delay.
    #[must_use]
    pub const fn new(initial: Duration) -> Self {
        Self { initial, cap: None }
    }

    /// Caps every delay at the given maximum.
    #[must_use]
    pub const fn with_cap(mut self, cap: Duration) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Starts a fresh backoff sequence at the initial delay.
    ///
    /// Constructing a new sequence per item is what resets the backoff after
    /// a success.
    #[must_use]
    pub const fn delays(&self) -> Backoff {
        Backoff {
            next: self.initial,
            cap: self.cap,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_SLEEP)
    }
}

/// One in-progress backoff sequence.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    next: Duration,
    cap: Option<Duration>,
}

impl Backoff {
    /// Returns the delay to sleep now and doubles the stored delay.
    ///
    /// Growth saturates rather than overflowing; with a cap, both the
    /// returned and the stored delay are clamped.
    pub fn next_delay(&mut self) -> Duration {
        let cap = self.cap;
        let clamp = move |delay: Duration| cap.map_or(delay, |limit| delay.min(limit));
        let current = clamp(self.next);
        self.next = clamp(self.next.saturating_mul(2));
        current
    }
}
