use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::chunker;
use crate::language_utils;
use crate::providers::anthropic::Anthropic;
use crate::providers::ollama::Ollama;
use crate::providers::openai::OpenAI;
use crate::providers::{ChatRequest, CompletionProvider};

// @module: Chunked translation through an AI provider

// @struct: Token usage statistics
#[derive(Clone)]
pub struct TokenUsageStats {
    // @field: Number of prompt tokens
    pub prompt_tokens: u64,

    // @field: Number of completion tokens
    pub completion_tokens: u64,

    // @field: Total number of tokens
    pub total_tokens: u64,

    // @field: Start time of token tracking
    pub start_time: Instant,

    // @field: Total time spent on API requests
    pub api_duration: Duration,

    // @field: Provider name
    pub provider: String,

    // @field: Model name
    pub model: String,
}

impl TokenUsageStats {
    // @creates: New token usage stats with provider info
    pub fn with_provider_info(provider: String, model: String) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            start_time: Instant::now(),
            api_duration: Duration::from_secs(0),
            provider,
            model,
        }
    }

    // @updates: Add token usage numbers
    pub fn add_token_usage(&mut self, prompt_tokens: Option<u64>, completion_tokens: Option<u64>) {
        if let Some(pt) = prompt_tokens {
            self.prompt_tokens += pt;
            self.total_tokens += pt;
        }

        if let Some(ct) = completion_tokens {
            self.completion_tokens += ct;
            self.total_tokens += ct;
        }
    }

    // @updates: Add API request duration
    pub fn add_request_duration(&mut self, duration: Duration) {
        self.api_duration += duration;
    }

    // @returns: Summary of token usage as a string
    pub fn summary(&self) -> String {
        let api_time = if self.api_duration.as_secs_f64() > 0.0 {
            format!(" in {:.1}s of API time", self.api_duration.as_secs_f64())
        } else {
            String::new()
        };

        format!(
            "Token usage: {} total ({} prompt, {} completion){} [{} - {}]",
            self.total_tokens,
            self.prompt_tokens,
            self.completion_tokens,
            api_time,
            self.provider,
            self.model
        )
    }
}

// Patterns stripped from model output before use. Completion models
// routinely wrap the translation in a markdown code fence even when told
// not to; the fences are artifacts of the chat format, never content.
static PLAINTEXT_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```plaintext[ \t]*\r?\n?").unwrap());
static BARE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n?```[ \t]*\r?\n?").unwrap());

/// Remove markdown code-fence artifacts from a model response.
///
/// Two patterns are stripped, in order:
/// 1. a fence tagged `plaintext`, together with its trailing newline
/// 2. any remaining bare triple-backtick fence, together with the newlines
///    hugging it
///
/// Everything else passes through untouched; in particular no whitespace
/// inside the translation is trimmed.
pub fn strip_response_artifacts(response: &str) -> String {
    let cleaned = PLAINTEXT_FENCE.replace_all(response, "");
    BARE_FENCE.replace_all(&cleaned, "").into_owned()
}

// @struct: Translation service
pub struct TranslationService {
    // @field: Provider implementation
    provider: Box<dyn CompletionProvider>,

    // @field: Configuration
    config: TranslationConfig,
}

impl TranslationService {
    /// Create a new translation service from configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.get_timeout_secs());

        let provider: Box<dyn CompletionProvider> = match config.provider {
            ConfigTranslationProvider::OpenAI => Box::new(OpenAI::with_timeout(
                config.get_api_key(),
                config.get_endpoint(),
                timeout,
            )),
            ConfigTranslationProvider::Anthropic => Box::new(Anthropic::with_timeout(
                config.get_api_key(),
                config.get_endpoint(),
                timeout,
            )),
            ConfigTranslationProvider::Ollama => {
                Box::new(Ollama::with_timeout(config.get_endpoint(), timeout))
            }
        };

        Ok(Self { provider, config })
    }

    /// Create a translation service around an existing provider.
    /// Used by tests to run the pipeline against a scripted provider.
    pub fn with_provider(provider: Box<dyn CompletionProvider>, config: TranslationConfig) -> Self {
        Self { provider, config }
    }

    /// Test the connection to the configured provider
    pub async fn test_connection(&self) -> Result<()> {
        let model = self.config.get_model();
        self.provider
            .test_connection(&model)
            .await
            .map_err(|e| anyhow!("Failed to connect to {} API: {}", self.provider.name(), e))
    }

    /// Build the system instruction for a target language.
    ///
    /// The configured template may address the language by placeholder; the
    /// full English language name is substituted when the code resolves,
    /// since models follow "translate into French" more reliably than
    /// "translate into fr".
    fn build_system_prompt(&self, target_language: &str) -> String {
        let language_name = language_utils::get_language_name(target_language)
            .unwrap_or_else(|_| target_language.to_string());

        self.config
            .common
            .system_prompt
            .replace("{target_language}", &language_name)
    }

    /// Translate a text into the target language.
    ///
    /// The text is split into line-bounded chunks and each chunk is
    /// translated with one completion request, strictly in order; the
    /// cleaned chunk translations are joined back with newlines. Any chunk
    /// failure fails the whole text: there is no partial result, the caller
    /// retries the document on a later poll cycle.
    pub async fn translate_text(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<(String, TokenUsageStats)> {
        let system_prompt = self.build_system_prompt(target_language);
        let model = self.config.get_model();
        let chunks = chunker::split_lines(text, self.config.common.max_chunk_lines);

        let mut usage = TokenUsageStats::with_provider_info(
            self.provider.name().to_string(),
            model.clone(),
        );
        let mut translated_chunks = Vec::with_capacity(chunks.len());

        debug!(
            "Translating {} chunk(s) with {} - {}",
            chunks.len(),
            self.provider.name(),
            model
        );

        for (chunk_idx, chunk) in chunks.iter().enumerate() {
            if chunk_idx > 0 && self.config.common.request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.common.request_delay_ms)).await;
            }

            let request = ChatRequest {
                model: model.clone(),
                system: system_prompt.clone(),
                user: chunk.clone(),
                temperature: self.config.common.temperature,
                max_tokens: self.config.common.max_tokens,
            };

            let request_start = Instant::now();
            let response = self
                .provider
                .complete(request)
                .await
                .map_err(|e| anyhow!("Chunk {}/{} failed: {}", chunk_idx + 1, chunks.len(), e))?;
            usage.add_request_duration(request_start.elapsed());
            usage.add_token_usage(response.prompt_tokens, response.completion_tokens);

            let raw_text = response
                .first_choice_text()
                .map_err(|e| anyhow!("Chunk {}/{} failed: {}", chunk_idx + 1, chunks.len(), e))?;

            translated_chunks.push(strip_response_artifacts(raw_text));
        }

        Ok((translated_chunks.join("\n"), usage))
    }

    /// Name of the active provider, for logs
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Model the service sends requests to
    pub fn model(&self) -> String {
        self.config.get_model()
    }
}
