/*!
 * Mock translator for testing.
 *
 * This module provides a scripted backend that simulates different behaviors:
 * - `MockTranslator::working()` - Always succeeds with a tagged translation
 * - `MockTranslator::failing()` - Always fails with an error
 * - `MockTranslator::failing_on(..)` - Fails only for the given inputs
 * - `MockTranslator::intermittent(n)` - Fails every Nth request
 *
 * Every input it receives is recorded so tests can assert on what was sent.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::Translator;
use crate::errors::ProviderError;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with `[<lang>] <text>`
    Working,
    /// Always fails with an API error
    Failing,
    /// Fails for these exact inputs, succeeds otherwise
    FailingOn(HashSet<String>),
    /// Fails every Nth request
    Intermittent { fail_every: usize },
    /// Succeeds after a delay that shrinks with the request number
    Staggered { base_delay_ms: u64 },
}

/// Mock translator for testing orchestration behavior
#[derive(Debug, Clone)]
pub struct MockTranslator {
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockTranslator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn failing_on<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MockBehavior::FailingOn(inputs.into_iter().map(Into::into).collect()))
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent {
            fail_every: fail_every.max(1),
        })
    }

    /// Earlier requests finish later, so completion order is the reverse of submission order
    pub fn staggered(base_delay_ms: u64) -> Self {
        Self::new(MockBehavior::Staggered { base_delay_ms })
    }

    /// The translation the working behavior produces for `text`
    pub fn expected(text: &str, target_language: &str) -> String {
        format!("[{}] {}", target_language, text)
    }

    /// Inputs received so far, in arrival order
    pub fn received(&self) -> Vec<String> {
        self.received.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.received.lock().push(text.to_string());

        let failure = || ProviderError::ApiError {
            status_code: 500,
            message: format!("Simulated failure for request {}", count + 1),
        };

        match &self.behavior {
            MockBehavior::Working => Ok(Self::expected(text, target_language)),
            MockBehavior::Failing => Err(failure()),
            MockBehavior::FailingOn(inputs) => {
                if inputs.contains(text) {
                    Err(failure())
                } else {
                    Ok(Self::expected(text, target_language))
                }
            }
            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(failure())
                } else {
                    Ok(Self::expected(text, target_language))
                }
            }
            MockBehavior::Staggered { base_delay_ms } => {
                let remaining = 10usize.saturating_sub(count) as u64;
                tokio::time::sleep(Duration::from_millis(base_delay_ms * remaining)).await;
                Ok(Self::expected(text, target_language))
            }
        }
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}
