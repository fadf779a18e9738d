/*!
 * Error types for the doctrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * The error classes follow the pipeline's failure taxonomy: provider, repository
 * and document errors are transient per-item failures (the item is skipped for
 * the current cycle and retried on the next one); configuration errors are fatal
 * at startup before the poll loop begins.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The completion response carried no choices to consume
    #[error("API response contained no choices")]
    EmptyResponse,

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur when talking to a document repository backend
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Listing a folder failed
    #[error("Failed to list folder: {0}")]
    ListFailed(String),

    /// Downloading an item failed
    #[error("Failed to download item: {0}")]
    DownloadFailed(String),

    /// Uploading an artifact failed
    #[error("Failed to upload artifact: {0}")]
    UploadFailed(String),

    /// The requested item does not exist in the backend
    #[error("Item not found: {0}")]
    NotFound(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while extracting text from or reassembling a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document bytes are not valid for the declared format
    #[error("Failed to parse document: {0}")]
    Parse(String),

    /// OOXML (.docx) container error
    #[error("Word document error: {0}")]
    Ooxml(String),

    /// PDF container error
    #[error("PDF document error: {0}")]
    Pdf(String),

    /// Rebuilding the output document failed
    #[error("Failed to reassemble document: {0}")]
    Reassembly(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or incomplete configuration (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from a repository backend
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Error from document processing
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Repository(RepositoryError::Io(error))
    }
}
