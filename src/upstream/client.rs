use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

use super::{
    ReqwestTransport, RetryPolicy, RetryState, Sleeper, TokioSleeper, Transport, UpstreamOutcome,
    UpstreamRequest,
};
use crate::error::IsRetryable;

/// Runs an [`UpstreamRequest`] under a [`RetryPolicy`].
///
/// Stateless between calls; cloning shares the underlying transport.
#[derive(Clone)]
pub struct RetryingClient {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryingClient {
    pub fn new(transport: Arc<dyn Transport>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { transport, sleeper }
    }

    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self::new(
            Arc::new(ReqwestTransport::new(client)),
            Arc::new(TokioSleeper),
        )
    }

    pub async fn execute(
        &self,
        request: &UpstreamRequest,
        policy: &RetryPolicy,
    ) -> UpstreamOutcome {
        let mut state = RetryState::Attempting { attempt: 1 };
        loop {
            state = match state {
                RetryState::Attempting { attempt } => {
                    let start = Instant::now();
                    let outcome = UpstreamOutcome::from(self.transport.send(request).await);
                    debug!(
                        operation = request.operation(),
                        attempt,
                        max_attempts = policy.max_attempts(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        outcome = %outcome.summary(),
                        "[Upstream] attempt finished"
                    );
                    policy.advance(attempt, outcome)
                }
                RetryState::Retrying {
                    attempt,
                    delay,
                    last,
                } => {
                    warn!(
                        operation = request.operation(),
                        attempt,
                        max_attempts = policy.max_attempts(),
                        delay_ms = delay.as_millis() as u64,
                        reason = %last.summary(),
                        "[Upstream] retrying after backoff"
                    );
                    self.sleeper.sleep(delay).await;
                    RetryState::Attempting {
                        attempt: attempt + 1,
                    }
                }
                RetryState::Terminal(outcome) => {
                    if outcome.is_retryable() {
                        error!(
                            operation = request.operation(),
                            max_attempts = policy.max_attempts(),
                            reason = %outcome.summary(),
                            "[Upstream] giving up, retry budget exhausted"
                        );
                    }
                    return outcome;
                }
            };
        }
    }
}
