/*!
 * Provider implementations for the translation completion services.
 *
 * This module contains client implementations for various LLM providers:
 * - OpenAI: OpenAI API integration
 * - Anthropic: Anthropic API integration
 * - Ollama: Local LLM server
 *
 * Each client speaks its provider's wire format internally; the pipeline only
 * ever sees the unified [`ChatRequest`]/[`ChatResponse`] pair, in which a
 * response is an ordered list of choices and the first choice carries the
 * translation.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A single chat-style completion request.
///
/// One request carries one chunk of source text: the system instruction sets
/// up the translation task and the user content is the chunk itself.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model name to use for the completion
    pub model: String,
    /// System instruction guiding the model
    pub system: String,
    /// User content to complete against (the chunk to translate)
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
}

/// One completion alternative returned by a provider.
#[derive(Debug, Clone)]
pub struct ChatChoice {
    /// The text payload of this choice
    pub text: String,
}

/// The unified completion response: an ordered list of choices plus token
/// accounting where the provider reports it. The pipeline always consumes
/// choice 0.
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    /// Ordered completion choices
    pub choices: Vec<ChatChoice>,
    /// Number of prompt tokens consumed, if reported
    pub prompt_tokens: Option<u64>,
    /// Number of completion tokens generated, if reported
    pub completion_tokens: Option<u64>,
}

impl ChatResponse {
    /// Text of the first choice, or an error when the provider returned none.
    pub fn first_choice_text(&self) -> Result<&str, ProviderError> {
        self.choices
            .first()
            .map(|choice| choice.text.as_str())
            .ok_or(ProviderError::EmptyResponse)
    }
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must
/// follow, allowing them to be used interchangeably in the translation
/// service.
#[async_trait]
pub trait CompletionProvider: Send + Sync + Debug {
    /// Complete a chat request using this provider
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self, model: &str) -> Result<(), ProviderError>;

    /// Human-readable provider name for logs
    fn name(&self) -> &'static str;
}

pub mod anthropic;
pub mod mock;
pub mod ollama;
pub mod openai;
