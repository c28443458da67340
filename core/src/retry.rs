//! Bounded retry with exponential backoff around a `Transport`.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; never less than one.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before attempt `attempt + 1`, where `attempt` starts at 1.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Send `request`, retrying transport failures and 502/503/504 responses.
    ///
    /// Requests whose method is not retry-safe get a single attempt. When the
    /// attempts run out the last response or error is returned unchanged.
    pub fn execute<T: Transport>(
        &self,
        transport: &T,
        request: &HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        let max_attempts = if request.method.is_retry_safe() {
            self.max_attempts.max(1)
        } else {
            1
        };

        let mut attempt = 1;
        loop {
            debug!(attempt, method = request.method.as_str(), path = %request.path, "attempt");
            let outcome = transport.execute(request);
            let retryable = match &outcome {
                Ok(response) => response.is_transient_failure(),
                Err(_) => true,
            };
            if !retryable || attempt >= max_attempts {
                return outcome;
            }

            let delay = self.backoff(attempt);
            match &outcome {
                Ok(response) => warn!(attempt, status = response.status, ?delay, "transient status, retrying"),
                Err(err) => warn!(attempt, error = %err, ?delay, "request failed, retrying"),
            }
            thread::sleep(delay);
            attempt += 1;
        }
    }
}
