/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds, marking every input line
 * - `MockProvider::fenced()` - Succeeds but wraps the output in code fences
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::empty()` - Returns a response with no choices
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{ChatChoice, ChatRequest, ChatResponse, CompletionProvider};

/// Prefix added to every line by the working mock behavior
pub const MOCK_LINE_PREFIX: &str = "[TRANSLATED] ";

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds, prefixing every input line (line structure preserved)
    Working,
    /// Succeeds but wraps the marked output in ```plaintext fences
    Fenced,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Fails the first N requests, then succeeds
    FailFirst { failures: usize },
    /// Always fails with an error
    Failing,
    /// Returns a response with an empty choices list
    Empty,
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock whose responses carry markdown code fences
    pub fn fenced() -> Self {
        Self::new(MockBehavior::Fenced)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a mock that fails its first `failures` requests then recovers
    pub fn fail_first(failures: usize) -> Self {
        Self::new(MockBehavior::FailFirst { failures })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns no choices
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Number of completion requests this provider has received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// A handle onto the shared request counter, usable after the provider
    /// has been boxed into a translation service
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.request_count)
    }

    /// Mark every line of the input the way the working behavior does
    pub fn mark_lines(text: &str) -> String {
        text.split('\n')
            .map(|line| format!("{}{}", MOCK_LINE_PREFIX, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
        }
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(ChatResponse {
                choices: vec![ChatChoice {
                    text: Self::mark_lines(&request.user),
                }],
                prompt_tokens: Some(request.user.len() as u64),
                completion_tokens: Some((request.user.len() / 2) as u64),
            }),

            MockBehavior::Fenced => Ok(ChatResponse {
                choices: vec![ChatChoice {
                    text: format!("```plaintext\n{}\n```", Self::mark_lines(&request.user)),
                }],
                prompt_tokens: Some(10),
                completion_tokens: Some(10),
            }),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                    })
                } else {
                    Ok(ChatResponse {
                        choices: vec![ChatChoice {
                            text: Self::mark_lines(&request.user),
                        }],
                        prompt_tokens: Some(10),
                        completion_tokens: Some(10),
                    })
                }
            }

            MockBehavior::FailFirst { failures } => {
                if count < failures {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated startup failure (request #{})", count + 1),
                    })
                } else {
                    Ok(ChatResponse {
                        choices: vec![ChatChoice {
                            text: Self::mark_lines(&request.user),
                        }],
                        prompt_tokens: Some(10),
                        completion_tokens: Some(10),
                    })
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::Empty => Ok(ChatResponse {
                choices: Vec::new(),
                prompt_tokens: Some(0),
                completion_tokens: Some(0),
            }),
        }
    }

    async fn test_connection(&self, _model: &str) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::RequestFailed(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}
