use crate::checking::constants::{BACKOFF_STEP, MAX_ATTEMPTS};
use crate::error::{CheckError, Result};
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Bounded retry with linear backoff. Transport failures are always retried;
/// whether a non-success status is retried is decided per call site.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: MAX_ATTEMPTS,
            backoff_step: BACKOFF_STEP,
        }
    }
}

impl RetryPolicy {
    /// Wait after the given 1-based attempt failed
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }

    /// Sends the request built by `build` until it yields a success status or
    /// the attempt budget runs out. `retry_status` decides whether a
    /// non-success status is worth another attempt.
    pub async fn send<B, R>(&self, label: &str, build: B, retry_status: R) -> Result<Response>
    where
        B: Fn() -> RequestBuilder,
        R: Fn(StatusCode) -> bool,
    {
        let mut attempt = 1;
        loop {
            match build().send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    warn!(request = label, attempt, status = status.as_u16(), "non-success status");
                    if !retry_status(status) || attempt >= self.max_attempts {
                        return Err(CheckError::Status {
                            status: status.as_u16(),
                            attempts: attempt,
                        });
                    }
                }
                Err(e) if e.is_builder() => return Err(CheckError::Request(e)),
                Err(e) => {
                    warn!(request = label, attempt, error = %e, "request failed");
                    if attempt >= self.max_attempts {
                        return Err(CheckError::Exhausted {
                            attempts: attempt,
                            source: e,
                        });
                    }
                }
            }

            sleep(self.backoff(attempt)).await;
            attempt += 1;
        }
    }
}
