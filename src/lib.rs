/*!
 * # doctrans - Folder-Watching Document Translation with AI
 *
 * A Rust daemon that polls a source document folder, translates newly added
 * documents into a configured target language using AI providers, and
 * publishes the translated artifacts to a destination folder.
 *
 * ## Features
 *
 * - Continuous polling of a source folder with a configurable interval
 * - Translation using various AI providers:
 *   - OpenAI API
 *   - Anthropic API
 *   - Ollama (local LLM)
 * - Plain text, subtitle, Word (.docx) and PDF document support
 * - Duplicate-safe publishing: a document is translated at most once, and
 *   translated outputs are never picked up again as new inputs
 * - Token-budget-aware chunking of large documents
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `app_controller`: The poll/translate/publish pipeline controller
 * - `translation_service`: Chunked translation through an AI provider
 * - `chunker`: Line-bounded splitting of document text
 * - `completion_tracker`: Decides which source items still need translation
 * - `document_processor`: Per-format text extraction and reassembly
 * - `repository`: Source/destination folder backends:
 *   - `repository::fs`: Local-directory backend
 *   - `repository::memory`: In-memory backend for tests
 * - `providers`: Client implementations for the LLM providers:
 *   - `providers::openai`: OpenAI API client
 *   - `providers::anthropic`: Anthropic API client
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Scripted provider for tests
 * - `file_utils`: Naming convention and staging helpers
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod chunker;
pub mod completion_tracker;
pub mod document_processor;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod repository;
pub mod translation_service;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, CycleStats};
pub use completion_tracker::CompletionTracker;
pub use document_processor::ContentKind;
pub use errors::{AppError, DocumentError, ProviderError, RepositoryError};
pub use repository::{RemoteItem, Repository};
pub use translation_service::TranslationService;
