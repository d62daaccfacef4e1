/*!
 * Error types for the papertrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug, Clone, PartialEq)]
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

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The attempt did not finish within the backend's time limit
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::RequestFailed(format!("timed out: {}", error))
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur while translating one chunk of text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// Every allowed attempt failed; carries the cause of the final one
    #[error("Translation failed after {attempts} attempts: {last}")]
    Exhausted {
        /// Number of attempts made
        attempts: u32,
        /// Fault raised by the last attempt
        last: ProviderError,
    },
}

/// Errors raised while pulling text out of a PDF
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document could not be opened or parsed at all
    #[error("Failed to load PDF: {0}")]
    Load(String),

    /// A single page failed; the rest of the document is still usable
    #[error("Failed to extract page {page}: {message}")]
    Page {
        /// 1-based page number
        page: u32,
        /// Underlying failure
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// The input PDF does not exist
    #[error("PDF file not found: {0}")]
    InputNotFound(String),

    /// Extraction produced no page with text
    #[error("Could not extract any text from PDF: {0}")]
    NoText(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from PDF extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
