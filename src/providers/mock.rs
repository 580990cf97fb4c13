/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with translated text
 * - `MockProvider::echo()` - Returns the input unchanged
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::slow(ms)` - Succeeds after a delay
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{Provider, ProviderKind, code_from_table};

/// Languages the mock pretends to support
pub const MOCK_LANGUAGES: &[(&str, &str)] = &[
    ("eng", "en"),
    ("rus", "ru"),
    ("ukr", "uk"),
    ("jpn", "ja"),
    ("zho", "zh"),
    ("zht", "zh-TW"),
];

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with `[<dest>] <sentence>`
    Working,
    /// Returns the sentence unchanged
    Echo,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Fails for sentences containing the needle, works otherwise
    FailOn { needle: &'static str },
    /// Always fails with an error
    Failing,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&str, &str) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that returns its input unchanged
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a mock that fails only for sentences containing `needle`
    pub fn fail_on(needle: &'static str) -> Self {
        Self::new(MockBehavior::FailOn { needle })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that answers after `delay_ms`
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator taking `(sentence, dest_code)`
    pub fn with_custom_response(mut self, generator: fn(&str, &str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of `translate` calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn render(&self, sentence: &str, dest_code: &str) -> String {
        match self.custom_response {
            Some(generator) => generator(sentence, dest_code),
            None => format!("[{}] {}", dest_code, sentence),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Mock
    }

    fn provider_code(&self, canonical: &str) -> Result<String, ProviderError> {
        code_from_table(self.kind(), MOCK_LANGUAGES, canonical)
    }

    async fn translate(
        &self,
        sentence: &str,
        _src_code: &str,
        dest_code: &str,
    ) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(self.render(sentence, dest_code)),

            MockBehavior::Echo => Ok(sentence.to_string()),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.render(sentence, dest_code))
                }
            }

            MockBehavior::FailOn { needle } => {
                if sentence.contains(needle) {
                    Err(ProviderError::RequestFailed(format!(
                        "Simulated failure for '{}'",
                        sentence
                    )))
                } else {
                    Ok(self.render(sentence, dest_code))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.render(sentence, dest_code))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
