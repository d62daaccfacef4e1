/*!
 * Core translation service implementation.
 *
 * `TranslationService` runs the chunk-retry-validate pipeline on top of any
 * `TranslationBackend`:
 *
 * 1. text over the backend threshold is split into word-preserving chunks;
 * 2. every chunk gets up to `max_attempts` attempts, each bounded by the
 *    backend timeout, with exponential backoff between attempts;
 * 3. output shorter than `min_length_ratio` of the source is suspect and
 *    retried, but accepted once attempts run out;
 * 4. a chunk whose last attempt faults yields a `TranslationError`.
 *
 * Retry state is local to each chunk. Chunks of one text may run
 * concurrently up to the backend's limit; results keep source order.
 */

use anyhow::{anyhow, Result};
use futures::stream::{self, StreamExt};
use log::{debug, error, warn};
use std::sync::Arc;
use std::time::Duration;

use super::backend::{GoogleBackend, NullBackend, OllamaBackend, TranslationBackend};
use super::cache::TranslationCache;
use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::text::chunk_text;

/// Retry and validation settings for one chunk
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, first try included; at least 1
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled after each further failure
    pub initial_backoff: Duration,
    /// Output shorter than this fraction of the input is suspect
    pub min_length_ratio: f64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration, min_length_ratio: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            min_length_ratio,
        }
    }

    /// Whether `translation` is suspiciously short for `source_chars` of input
    pub fn is_suspect(&self, translation: &str, source_chars: usize) -> bool {
        (translation.chars().count() as f64) < source_chars as f64 * self.min_length_ratio
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1), 0.3)
    }
}

/// Best available translation of one chunk
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkTranslation {
    pub text: String,
    /// Attempts spent; 0 when served from cache
    pub attempts: u32,
    /// Still shorter than the validation ratio after the last attempt
    pub suspect: bool,
}

/// Translation of a whole text: one entry per chunk, in source order
#[derive(Debug, Clone)]
pub struct TranslationResult {
    pub chunks: Vec<Result<ChunkTranslation, TranslationError>>,
    separator: &'static str,
}

impl TranslationResult {
    pub fn new(chunks: Vec<Result<ChunkTranslation, TranslationError>>, separator: &'static str) -> Self {
        Self { chunks, separator }
    }

    /// Whether every chunk produced text
    pub fn is_complete(&self) -> bool {
        self.chunks.iter().all(Result::is_ok)
    }

    /// Joined text, only when every chunk succeeded
    pub fn text(&self) -> Option<String> {
        let parts: Option<Vec<&str>> = self.chunks
            .iter()
            .map(|chunk| chunk.as_ref().ok().map(|c| c.text.as_str()))
            .collect();
        parts.map(|parts| parts.join(self.separator))
    }

    /// Join chunks, rendering failed ones with `on_failure`
    pub fn render<F>(&self, on_failure: F) -> String
    where
        F: Fn(&TranslationError) -> String,
    {
        self.chunks
            .iter()
            .map(|chunk| match chunk {
                Ok(c) => c.text.clone(),
                Err(e) => on_failure(e),
            })
            .collect::<Vec<_>>()
            .join(self.separator)
    }

    pub fn failures(&self) -> impl Iterator<Item = &TranslationError> {
        self.chunks.iter().filter_map(|chunk| chunk.as_ref().err())
    }

    /// Chunks accepted despite failing the length check
    pub fn suspect_count(&self) -> usize {
        self.chunks
            .iter()
            .filter(|chunk| matches!(chunk, Ok(c) if c.suspect))
            .count()
    }
}

/// Main translation service
#[derive(Clone)]
pub struct TranslationService {
    backend: Arc<dyn TranslationBackend>,
    policy: RetryPolicy,
    cache: TranslationCache,
}

impl TranslationService {
    /// Create a service for the backend selected in `config`
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let common = &config.common;
        let backend: Arc<dyn TranslationBackend> = match config.provider {
            TranslationProvider::None => Arc::new(NullBackend::new()),
            TranslationProvider::Ollama => {
                Arc::new(OllamaBackend::new(&config.get_active_provider_config(), common))
            }
            TranslationProvider::Google => {
                Arc::new(GoogleBackend::new(&config.get_active_provider_config()))
            }
        };

        let policy = RetryPolicy::new(
            common.retry_count,
            Duration::from_millis(common.retry_backoff_ms),
            common.min_length_ratio,
        );
        let cache_enabled = common.cache_enabled && config.provider != TranslationProvider::None;

        Ok(Self::with_backend(backend, policy).with_cache(TranslationCache::new(cache_enabled)))
    }

    /// Create a service around an existing backend, cache disabled
    pub fn with_backend(backend: Arc<dyn TranslationBackend>, policy: RetryPolicy) -> Self {
        Self {
            backend,
            policy,
            cache: TranslationCache::new(false),
        }
    }

    pub fn with_cache(mut self, cache: TranslationCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Check that the backend is reachable
    pub async fn test_connection(&self) -> Result<()> {
        self.backend
            .test_connection()
            .await
            .map_err(|e| anyhow!("Failed to connect to {}: {}", self.backend.name(), e))
    }

    /// Translate a whole text, chunking it when it exceeds the backend limit.
    ///
    /// Never fails as a whole: failed chunks are reported inside the result.
    pub async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> TranslationResult {
        let profile = self.backend.profile();

        if let Some(cached) = self.cache.get(text, source_language, target_language) {
            let chunk = ChunkTranslation { text: cached, attempts: 0, suspect: false };
            return TranslationResult::new(vec![Ok(chunk)], profile.separator);
        }

        let chunks = chunk_text(text, profile.chunk_threshold, profile.chunk_size);
        if chunks.len() > 1 {
            debug!("Split {} chars into {} chunks for {}", text.chars().count(), chunks.len(), self.backend.name());
        }

        // `buffered` keeps output in input order regardless of completion order
        let results: Vec<_> = stream::iter(chunks)
            .map(|chunk| async move {
                self.translate_chunk(&chunk, source_language, target_language).await
            })
            .buffered(profile.concurrent_requests.max(1))
            .collect()
            .await;

        let result = TranslationResult::new(results, profile.separator);
        // Short output accepted after the last retry is not reused
        if let Some(joined) = result.text().filter(|_| result.suspect_count() == 0) {
            self.cache.store(text, source_language, target_language, &joined);
        }
        result
    }

    /// Translate one chunk with retry, backoff and length validation
    pub async fn translate_chunk(
        &self,
        chunk: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<ChunkTranslation, TranslationError> {
        let profile = self.backend.profile();
        let max_attempts = self.policy.max_attempts;
        let source_chars = chunk.chars().count();
        let mut backoff = self.policy.initial_backoff;

        for attempt in 1..=max_attempts {
            if !profile.request_delay.is_zero() {
                tokio::time::sleep(profile.request_delay).await;
            }

            let outcome = tokio::time::timeout(
                profile.timeout,
                self.backend.translate_chunk(chunk, source_language, target_language),
            )
            .await
            .unwrap_or_else(|_| Err(ProviderError::Timeout(profile.timeout.as_secs())));

            let retries_left = attempt < max_attempts;
            match outcome {
                Ok(text) if profile.validate_length && self.policy.is_suspect(&text, source_chars) => {
                    if retries_left {
                        warn!(
                            "{} returned {} chars for {} source chars, retrying (attempt {}/{})",
                            self.backend.name(), text.chars().count(), source_chars, attempt, max_attempts
                        );
                    } else {
                        warn!(
                            "{} translation still short after {} attempts, accepting it",
                            self.backend.name(), attempt
                        );
                        return Ok(ChunkTranslation { text, attempts: attempt, suspect: true });
                    }
                }
                Ok(text) => {
                    return Ok(ChunkTranslation { text, attempts: attempt, suspect: false });
                }
                Err(e) => {
                    if retries_left {
                        warn!("{} error: {} (attempt {}/{})", self.backend.name(), e, attempt, max_attempts);
                    } else {
                        error!("{} failed after {} attempts: {}", self.backend.name(), attempt, e);
                        return Err(TranslationError::Exhausted { attempts: attempt, last: e });
                    }
                }
            }

            tokio::time::sleep(backoff).await;
            backoff = backoff.saturating_mul(2);
        }

        Err(TranslationError::Exhausted {
            attempts: 0,
            last: ProviderError::RequestFailed("no attempt was allowed".to_string()),
        })
    }
}
