use std::time::Duration;

use super::UpstreamOutcome;
use crate::error::IsRetryable;

/// Bounded retry with exponential backoff: the n-th retry waits `backoff_unit * 2^(n-1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_unit: Duration,
}

/// Where a retry sequence currently stands.
#[derive(Debug)]
pub enum RetryState {
    /// About to send attempt number `attempt` (1-based).
    Attempting { attempt: u32 },
    /// Attempt `attempt` failed with a retryable `last`; wait `delay` before the next one.
    Retrying {
        attempt: u32,
        delay: Duration,
        last: UpstreamOutcome,
    },
    /// Done; no more attempts and no more sleeps.
    Terminal(UpstreamOutcome),
}

impl RetryPolicy {
    pub const DEFAULT_TOKEN_ATTEMPTS: u32 = 3;
    pub const DEFAULT_DATA_ATTEMPTS: u32 = 4;

    /// `max_attempts` counts the first call; zero is bumped to one.
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }

    pub fn token(backoff_unit: Duration) -> Self {
        Self::new(Self::DEFAULT_TOKEN_ATTEMPTS, backoff_unit)
    }

    pub fn data(backoff_unit: Duration) -> Self {
        Self::new(Self::DEFAULT_DATA_ATTEMPTS, backoff_unit)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff_unit(&self) -> Duration {
        self.backoff_unit
    }

    /// Delay after failed attempt `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.backoff_unit.saturating_mul(1u32 << exp)
    }

    /// Transition out of attempt `attempt` given what it produced.
    pub fn advance(&self, attempt: u32, outcome: UpstreamOutcome) -> RetryState {
        if outcome.is_retryable() && attempt < self.max_attempts {
            RetryState::Retrying {
                attempt,
                delay: self.backoff(attempt),
                last: outcome,
            }
        } else {
            RetryState::Terminal(outcome)
        }
    }
}
