/*!
 * Translation backends.
 *
 * This module contains client implementations for the supported backends:
 * - DeepL: authenticated API, requires an auth key
 * - Google: unauthenticated web endpoint
 * - Mock: scripted backend used by tests
 *
 * Both real clients share the retry policy in `send_with_retry`.
 */

use async_trait::async_trait;
use log::warn;
use reqwest::{RequestBuilder, Response, StatusCode};
use std::fmt::Debug;
use std::time::Duration;

use crate::errors::ProviderError;

pub mod deepl;
pub mod google;
pub mod mock;

/// Capability shared by every translation backend
///
/// Implementations are interchangeable; the orchestrator only ever calls
/// `translate` and decides itself what to do with a failure.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate `text` into `target_language`
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `target_language` - Target language code as configured (e.g. `ko`, `zh-CN`)
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError>;

    /// Human readable backend name for logs
    fn name(&self) -> &'static str;
}

/// Retry settings shared by the HTTP backends
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Base backoff, doubled on each retry
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_base_ms,
        }
    }

    /// Delay before the given retry (1-based)
    pub fn backoff_for(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let factor = 1u64.checked_shl(retry - 1).unwrap_or(u64::MAX);
        Duration::from_millis(self.backoff_base_ms.saturating_mul(factor))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1000)
    }
}

/// Map a non-success HTTP status to a provider error
pub fn error_for_status(status: StatusCode, message: String) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message,
        },
    }
}

/// Send a request, retrying transient failures with exponential backoff
///
/// `build` is called once per attempt. Network errors, HTTP 429 and 5xx are
/// retried; any other failure is returned immediately.
pub async fn send_with_retry<F>(backend: &str, policy: RetryPolicy, build: F) -> Result<Response, ProviderError>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0;

    loop {
        let error = match build().send().await {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) => {
                let status = response.status();
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to get error response text".to_string());
                error_for_status(status, message)
            }
            Err(e) => ProviderError::ConnectionError(e.to_string()),
        };

        if !error.is_transient() || attempt >= policy.max_retries {
            return Err(error);
        }

        attempt += 1;
        warn!(
            "{} request failed: {} - retry {}/{}",
            backend, error, attempt, policy.max_retries
        );
        tokio::time::sleep(policy.backoff_for(attempt)).await;
    }
}
