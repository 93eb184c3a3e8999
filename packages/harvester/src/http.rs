//! HTTP client wrapper for downloading from the eCFR API.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::Result;
use crate::fetch::{FetchError, FetchErrorKind};

/// User agent string identifying this harvester.
const USER_AGENT: &str = concat!("ecfr-harvester/", env!("CARGO_PKG_VERSION"));

/// Maximum number of attempts for transient failures.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// How often and how patiently transient failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Delay before the given attempt (0-based); doubles each retry.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        self.base_delay.saturating_mul(1u32 << (attempt - 1).min(16))
    }
}

/// Create a configured HTTP client.
pub fn create_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Download content from a URL with retry logic.
///
/// Connection errors, timeouts and 5xx responses are retried with
/// exponential backoff. Client errors (4xx) are reported as
/// [`FetchErrorKind::NotFound`] immediately.
pub fn download_bytes_with_retry(
    client: &Client,
    url: &str,
    policy: RetryPolicy,
) -> std::result::Result<Vec<u8>, FetchError> {
    let attempts = policy.max_attempts.max(1);
    let mut last_error: Option<String> = None;

    for attempt in 0..attempts {
        if attempt > 0 {
            let delay = policy.delay_before(attempt);
            tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying after delay");
            thread::sleep(delay);
        }

        match client.get(url).send() {
            Ok(response) => {
                let status = response.status();

                if status.is_server_error() {
                    tracing::warn!(
                        status = %status,
                        attempt = attempt + 1,
                        max_retries = attempts,
                        "Server error, will retry"
                    );
                    last_error = Some(format!("server error: {status}"));
                    continue;
                }

                // Client errors won't succeed on retry
                if status.is_client_error() {
                    return Err(FetchError::new(FetchErrorKind::NotFound, url, status.to_string()));
                }

                match response.bytes() {
                    Ok(bytes) => return Ok(bytes.to_vec()),
                    Err(e) => {
                        tracing::warn!(error = %e, attempt = attempt + 1, "Body read failed, will retry");
                        last_error = Some(e.to_string());
                        continue;
                    }
                }
            }
            Err(e) => {
                if e.is_connect() || e.is_timeout() {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_retries = attempts,
                        "Connection error, will retry"
                    );
                    last_error = Some(e.to_string());
                    continue;
                }
                return Err(FetchError::new(FetchErrorKind::Transient, url, e.to_string()));
            }
        }
    }

    Err(FetchError::new(
        FetchErrorKind::Transient,
        url,
        format!(
            "gave up after {attempts} attempts: {}",
            last_error.unwrap_or_else(|| "unknown error".to_string())
        ),
    ))
}
