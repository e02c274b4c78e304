use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::upstream::RetryPolicy;

/// Retry budgets for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Max attempts (first call included) for token exchange/refresh.
    /// TOML: `retry.token_max_attempts`. Default: `3`.
    #[serde(default = "default_token_max_attempts")]
    pub token_max_attempts: u32,

    /// Max attempts (first call included) for activities/zones.
    /// TOML: `retry.data_max_attempts`. Default: `4`.
    #[serde(default = "default_data_max_attempts")]
    pub data_max_attempts: u32,

    /// Backoff unit in milliseconds. The n-th retry waits `unit * 2^(n-1)`.
    /// TOML: `retry.backoff_unit_ms`. Default: `1000`.
    #[serde(default = "default_backoff_unit_ms")]
    pub backoff_unit_ms: u64,
}

impl RetryConfig {
    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }

    pub fn token_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.token_max_attempts, self.backoff_unit())
    }

    pub fn data_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.data_max_attempts, self.backoff_unit())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            token_max_attempts: default_token_max_attempts(),
            data_max_attempts: default_data_max_attempts(),
            backoff_unit_ms: default_backoff_unit_ms(),
        }
    }
}

/// Default filter applied to `GET /api/activities`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ActivitiesConfig {
    /// When set, requests without an explicit `after` only see activities from the last N
    /// weeks, counted in whole weeks starting on Monday (UTC). Unset forwards queries as-is.
    /// TOML: `activities.default_window_weeks`. Example: `15`.
    #[serde(default)]
    pub default_window_weeks: Option<u32>,
}

fn default_token_max_attempts() -> u32 {
    RetryPolicy::DEFAULT_TOKEN_ATTEMPTS
}

fn default_data_max_attempts() -> u32 {
    RetryPolicy::DEFAULT_DATA_ATTEMPTS
}

fn default_backoff_unit_ms() -> u64 {
    1000
}
