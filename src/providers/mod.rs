/*!
 * Provider implementations for different translation services.
 *
 * This module contains HTTP clients for the supported backends:
 * - Ollama: local LLM server (`/api/generate`)
 * - Google: public web translate endpoint
 *
 * Clients make exactly one attempt per call; retries, backoff and result
 * validation belong to the translation service.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the translation backends.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Send one request to the provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Check that the provider is reachable
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract the translated text from a response
    fn extract_text(response: &Self::Response) -> String;
}

pub mod google;
pub mod ollama;

/// First `max_chars` chars of a response body for log and error messages
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}
