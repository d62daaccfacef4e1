/*!
 * Tests for the translation service retry and chunking behavior
 */

use std::sync::Arc;
use std::time::Duration;

use papertrans::app_config::{TranslationConfig, TranslationProvider};
use papertrans::errors::{ProviderError, TranslationError};
use papertrans::translation::{RetryPolicy, TranslationCache, TranslationService, UNTRANSLATED_PLACEHOLDER};
use crate::common::{StubBackend, StubBehavior};

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::from_millis(1), 0.3)
}

/// Test that a failing backend is tried exactly max attempts times
#[tokio::test]
async fn test_translate_withAlwaysFailingBackend_shouldStopAtMaxAttempts() {
    for max_attempts in [1, 2, 5] {
        let backend = Arc::new(StubBackend::new(StubBehavior::Fail(
            ProviderError::ApiError { status_code: 500, message: "internal".to_string() },
        )));
        let service = TranslationService::with_backend(backend.clone(), fast_policy(max_attempts));

        let result = service.translate("A paragraph that will not translate.", "en", "fr").await;

        assert_eq!(backend.call_count(), max_attempts as usize);
        let failures: Vec<&TranslationError> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0],
            TranslationError::Exhausted { attempts, last: ProviderError::ApiError { status_code: 500, .. } }
                if *attempts == max_attempts
        ));
    }
}

/// Test recovery after transient failures
#[tokio::test]
async fn test_translate_withTransientFailures_shouldRecover() {
    let backend = Arc::new(StubBackend::new(StubBehavior::FailTimes(
        2,
        ProviderError::ConnectionError("reset".to_string()),
    )));
    let service = TranslationService::with_backend(backend.clone(), fast_policy(3));

    let result = service.translate("Cells divide rapidly.", "en", "de").await;

    assert_eq!(backend.call_count(), 3);
    assert_eq!(result.text().as_deref(), Some("[Cells divide rapidly.]"));
    assert!(matches!(&result.chunks[0], Ok(chunk) if chunk.attempts == 3));
}

/// Test that short output is retried then accepted
#[tokio::test]
async fn test_translate_withShortOutput_shouldRetryThenAccept() {
    let backend = Arc::new(StubBackend::new(StubBehavior::Fixed("ok".to_string())));
    let service = TranslationService::with_backend(backend.clone(), fast_policy(3));

    let result = service.translate("This source sentence is definitely longer.", "en", "fr").await;

    assert_eq!(backend.call_count(), 3);
    assert!(result.is_complete());
    assert_eq!(result.text().as_deref(), Some("ok"));
    assert_eq!(result.suspect_count(), 1);
}

/// Test chunks are translated separately and joined with the backend separator
#[tokio::test]
async fn test_translate_withLongText_shouldJoinChunksWithSeparator() {
    let backend = Arc::new(StubBackend::new(StubBehavior::Echo).with_chunking(20, 12, "\n"));
    let service = TranslationService::with_backend(backend.clone(), fast_policy(3));

    let result = service.translate("one two three four five six seven", "en", "fr").await;

    assert_eq!(backend.call_count(), result.chunks.len());
    assert_eq!(result.text().unwrap(), "[one two]\n[three four]\n[five six]\n[seven]");
}

/// Test one failing chunk does not discard the others
#[tokio::test]
async fn test_render_withFailedChunk_shouldKeepSuccessfulChunks() {
    let backend = Arc::new(
        StubBackend::new(StubBehavior::FailTimes(1, ProviderError::Timeout(5))).with_chunking(10, 11, " "),
    );
    let service = TranslationService::with_backend(backend, fast_policy(1));

    let result = service.translate("first part second part", "en", "fr").await;

    assert!(!result.is_complete());
    let rendered = result.render(|_| "<missing>".to_string());
    assert_eq!(rendered, "<missing> [second part]");
}

/// Test the null backend returns the placeholder without chunking
#[tokio::test]
async fn test_service_withNoneProvider_shouldReturnPlaceholder() {
    let config = TranslationConfig {
        provider: TranslationProvider::None,
        ..TranslationConfig::default()
    };
    let service = TranslationService::new(&config).unwrap();
    let long_text = "word ".repeat(2000);

    let result = service.translate(&long_text, "en", "zh").await;

    assert_eq!(service.backend_name(), "none");
    assert_eq!(result.text().as_deref(), Some(UNTRANSLATED_PLACEHOLDER));
    assert!(service.test_connection().await.is_ok());
}

/// Test repeated paragraphs hit the cache
#[tokio::test]
async fn test_translate_withRepeatedParagraph_shouldCallBackendOnce() {
    let backend = Arc::new(StubBackend::new(StubBehavior::Echo));
    let service = TranslationService::with_backend(backend.clone(), fast_policy(3))
        .with_cache(TranslationCache::new(true));

    for _ in 0..3 {
        let result = service.translate("Proceedings of the Society", "en", "fr").await;
        assert!(result.is_complete());
    }

    assert_eq!(backend.call_count(), 1);
    let (hits, misses, _) = service.cache().stats();
    assert_eq!((hits, misses), (2, 1));
}

/// Test failed translations are not cached
#[tokio::test]
async fn test_translate_withFailure_shouldNotCache() {
    let backend = Arc::new(StubBackend::new(StubBehavior::Fail(ProviderError::Timeout(1))));
    let service = TranslationService::with_backend(backend.clone(), fast_policy(2))
        .with_cache(TranslationCache::new(true));

    service.translate("Running header text", "en", "fr").await;
    service.translate("Running header text", "en", "fr").await;

    assert_eq!(backend.call_count(), 4);
    assert!(service.cache().is_empty());
}

/// Test translations accepted while still too short are not cached
#[tokio::test]
async fn test_translate_withShortAcceptedOutput_shouldNotCache() {
    let backend = Arc::new(StubBackend::new(StubBehavior::Fixed("x".to_string())));
    let service = TranslationService::with_backend(backend.clone(), fast_policy(3))
        .with_cache(TranslationCache::new(true));

    let first = service.translate("Proceedings of the Society", "en", "fr").await;
    let second = service.translate("Proceedings of the Society", "en", "fr").await;

    assert_eq!(first.suspect_count(), 1);
    assert_eq!(second.suspect_count(), 1);
    assert_eq!(backend.call_count(), 6);
    assert!(service.cache().is_empty());
}

/// Test the fixed request delay applies to retries as well as first attempts
#[tokio::test(start_paused = true)]
async fn test_translate_withRequestDelay_shouldPauseBeforeEveryAttempt() {
    let backend = Arc::new(
        StubBackend::new(StubBehavior::Fail(ProviderError::ConnectionError("refused".to_string())))
            .with_request_delay(Duration::from_millis(500)),
    );
    let service = TranslationService::with_backend(
        backend.clone(),
        RetryPolicy::new(2, Duration::from_secs(1), 0.3),
    );

    let start = tokio::time::Instant::now();
    let result = service.translate("Cells divide rapidly.", "en", "fr").await;

    assert_eq!(result.failures().count(), 1);
    assert_eq!(backend.call_count(), 2);
    assert_eq!(start.elapsed(), Duration::from_millis(2000));
}
