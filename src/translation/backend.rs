/*!
 * Translation backends.
 *
 * Each backend translates a single chunk in a single attempt and describes
 * its limits through a `BackendProfile`. Chunking, retries, backoff and
 * output validation are done once, in `TranslationService`, for all of them.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;

use crate::app_config::{ProviderConfig, TranslationCommonConfig};
use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::Provider;
use crate::providers::google::{GoogleRequest, GoogleTranslate};
use crate::providers::ollama::{GenerationRequest, Ollama};

/// Text returned by the null backend
pub const UNTRANSLATED_PLACEHOLDER: &str = "[Add translation here]";

/// Limits and pacing of one backend
#[derive(Debug, Clone)]
pub struct BackendProfile {
    /// Texts longer than this (chars) are chunked
    pub chunk_threshold: usize,
    /// Maximum chunk length (chars) once chunked
    pub chunk_size: usize,
    /// Joins translated chunks back together
    pub separator: &'static str,
    /// Upper bound on one attempt
    pub timeout: Duration,
    /// Fixed pause before every request
    pub request_delay: Duration,
    /// Chunks of one paragraph allowed in flight
    pub concurrent_requests: usize,
    /// Whether short output should be treated as suspect
    pub validate_length: bool,
}

impl BackendProfile {
    fn from_config(config: &ProviderConfig, separator: &'static str) -> Self {
        Self {
            chunk_threshold: config.chunk_threshold,
            chunk_size: config.chunk_size,
            separator,
            timeout: config.timeout(),
            request_delay: Duration::from_millis(config.request_delay_ms),
            concurrent_requests: config.concurrent_requests.max(1),
            validate_length: true,
        }
    }
}

/// A translation backend: one chunk, one attempt
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Human readable backend name
    fn name(&self) -> &str;

    /// Limits and pacing used by the service
    fn profile(&self) -> &BackendProfile;

    /// Translate one chunk
    async fn translate_chunk(
        &self,
        chunk: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Check that the backend is reachable
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Backend used when no translation is requested
#[derive(Debug)]
pub struct NullBackend {
    profile: BackendProfile,
}

impl NullBackend {
    pub fn new() -> Self {
        Self {
            profile: BackendProfile {
                chunk_threshold: usize::MAX,
                chunk_size: usize::MAX,
                separator: " ",
                timeout: Duration::from_secs(1),
                request_delay: Duration::ZERO,
                concurrent_requests: 1,
                validate_length: false,
            },
        }
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationBackend for NullBackend {
    fn name(&self) -> &str {
        "none"
    }

    fn profile(&self) -> &BackendProfile {
        &self.profile
    }

    async fn translate_chunk(&self, _chunk: &str, _source: &str, _target: &str) -> Result<String, ProviderError> {
        Ok(UNTRANSLATED_PLACEHOLDER.to_string())
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Local model served by Ollama
#[derive(Debug)]
pub struct OllamaBackend {
    client: Ollama,
    model: String,
    prompt_template: String,
    profile: BackendProfile,
}

impl OllamaBackend {
    pub fn new(config: &ProviderConfig, common: &TranslationCommonConfig) -> Self {
        Self {
            client: Ollama::new(config.endpoint.clone(), config.timeout()),
            model: config.model.clone(),
            prompt_template: common.prompt_template.clone(),
            profile: BackendProfile::from_config(config, " "),
        }
    }

    /// Fill the prompt template for one chunk
    pub fn build_prompt(&self, chunk: &str, source_language: &str, target_language: &str) -> String {
        render_prompt(&self.prompt_template, chunk, source_language, target_language)
    }
}

/// Replace `{source_language}`, `{target_language}` and `{text}` in a template.
///
/// Language codes are shown by English name when known.
pub fn render_prompt(template: &str, text: &str, source_language: &str, target_language: &str) -> String {
    let source_name = language_utils::get_language_name(source_language)
        .unwrap_or_else(|_| source_language.to_string());
    let target_name = language_utils::get_language_name(target_language)
        .unwrap_or_else(|_| target_language.to_string());

    // Text goes in last so braces inside it are never treated as placeholders
    template
        .replace("{source_language}", &source_name)
        .replace("{target_language}", &target_name)
        .replace("{text}", text)
}

#[async_trait]
impl TranslationBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    fn profile(&self) -> &BackendProfile {
        &self.profile
    }

    async fn translate_chunk(
        &self,
        chunk: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let prompt = self.build_prompt(chunk, source_language, target_language);
        let response = self.client.complete(GenerationRequest::new(&self.model, prompt)).await?;
        Ok(Ollama::extract_text(&response))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.client.test_connection().await
    }
}

/// Remote Google web translate API
#[derive(Debug)]
pub struct GoogleBackend {
    client: GoogleTranslate,
    profile: BackendProfile,
}

impl GoogleBackend {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: GoogleTranslate::new(config.endpoint.clone(), config.timeout()),
            profile: BackendProfile::from_config(config, "\n"),
        }
    }
}

#[async_trait]
impl TranslationBackend for GoogleBackend {
    fn name(&self) -> &str {
        "google"
    }

    fn profile(&self) -> &BackendProfile {
        &self.profile
    }

    async fn translate_chunk(
        &self,
        chunk: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let request = GoogleRequest::new(chunk, source_language, target_language);
        let response = self.client.complete(request).await?;
        // Surface malformed payloads as faults instead of empty translations
        response.sentences().map(|text| text.trim().to_string())
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.client.test_connection().await
    }
}
