// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retry with exponential backoff.
//!
//! The delay before retry `n` (0-based) is `initial_backoff * 2^n`, capped at
//! `max_backoff`. Only errors the classifier deems retryable are retried.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{is_retryable, Error, Result};

/// Attempt limit and backoff bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` of 0 means no limit.
    pub fn new(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Result<Self> {
        if initial_backoff.is_zero() {
            return Err(Error::InvalidConfig {
                field: "initial_backoff",
                reason: "must be positive".to_string(),
            });
        }
        if max_backoff < initial_backoff {
            return Err(Error::InvalidConfig {
                field: "max_backoff",
                reason: format!(
                    "must be >= initial_backoff ({:?} < {:?})",
                    max_backoff, initial_backoff
                ),
            });
        }
        Ok(RetryPolicy {
            max_attempts,
            initial_backoff,
            max_backoff,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_backoff(&self) -> Duration {
        self.initial_backoff
    }

    pub fn max_backoff(&self) -> Duration {
        self.max_backoff
    }

    /// True when no attempt limit is set.
    pub fn is_unlimited(&self) -> bool {
        self.max_attempts == 0
    }

    /// Whether `attempts` failed attempts use up the limit.
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        !self.is_unlimited() && attempts >= self.max_attempts
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .map_or(self.max_backoff, |d| d.min(self.max_backoff))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 5,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// Runs `operation` until it succeeds, fails permanently, runs out of
/// attempts or `cancel` fires.
pub async fn retry_with_backoff<T, F, Fut>(
    cancel: &CancellationToken,
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempts = 0u32;
    let mut last: Option<Error> = None;

    loop {
        if cancel.is_cancelled() {
            return Err(Error::RetryCancelled {
                attempts,
                last: last.map(Box::new),
            });
        }

        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        attempts += 1;

        if !is_retryable(&err) {
            return Err(Error::NonRetryable {
                attempts,
                source: Box::new(err),
            });
        }
        if policy.is_exhausted(attempts) {
            return Err(Error::RetriesExhausted {
                attempts,
                source: Box::new(err),
            });
        }

        let delay = policy.backoff(attempts - 1);
        debug!(attempt = attempts, ?delay, error = %err, "retrying after backoff");
        last = Some(err);

        tokio::select! {
            _ = cancel.cancelled() => {
                return Err(Error::RetryCancelled {
                    attempts,
                    last: last.map(Box::new),
                });
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
