/*!
 * Tests for application configuration functionality
 */

use papertrans::app_config::{
    Config, LogLevel, OutputFormat, ProviderConfig, TranslationProvider,
};
use papertrans::errors::AppError;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "zh-CN");
    assert_eq!(config.translation.provider, TranslationProvider::None);
    assert_eq!(config.log_level, LogLevel::Info);

    let ollama_config = config.translation.get_provider_config(&TranslationProvider::Ollama)
        .expect("Ollama provider config should exist");
    assert_eq!(ollama_config.model, "llama3");
    assert_eq!(ollama_config.endpoint, "http://localhost:11434");
    assert_eq!(ollama_config.concurrent_requests, 1);

    let common = &config.translation.common;
    assert_eq!(common.retry_count, 3);
    assert_eq!(common.retry_backoff_ms, 1000);
    assert!((common.min_length_ratio - 0.3).abs() < f64::EPSILON);
    assert!(common.prompt_template.contains("{text}"));

    assert_eq!(config.document.format, OutputFormat::Docx);
    assert_eq!(config.document.min_paragraph_chars, 10);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Invalid source language
    config.source_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.source_language = "en".to_string();

    // Invalid target language
    config.target_language = "".to_string();
    assert!(config.validate().is_err());
    config.target_language = "fr".to_string();
    assert!(config.validate().is_ok());

    // Ratio outside [0, 1]
    config.translation.common.min_length_ratio = 1.5;
    assert!(config.validate().is_err());
    config.translation.common.min_length_ratio = 0.3;

    // Ollama needs a model
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.provider_config_mut(TranslationProvider::Ollama).model = String::new();
    assert!(config.validate().is_err());
    config.translation.provider_config_mut(TranslationProvider::Ollama).model = "llama3".to_string();
    assert!(config.validate().is_ok());

    // Chunk size must be positive
    config.translation.provider_config_mut(TranslationProvider::Ollama).chunk_size = 0;
    assert!(config.validate().is_err());
}

/// Test validation failures are reported as configuration errors
#[test]
fn test_config_validation_withInvalidValues_shouldReturnConfigError() {
    let mut config = Config::default();
    config.translation.common.retry_count = 0;
    let error = config.validate().unwrap_err();
    assert!(matches!(error.downcast_ref::<AppError>(), Some(AppError::Config(msg)) if msg.contains("retry_count")));

    let mut config = Config::default();
    config.target_language = "xyz".to_string();
    let error = config.validate().unwrap_err();
    assert!(matches!(error.downcast_ref::<AppError>(), Some(AppError::Config(_))));
}

/// Test that matching source and target languages only warn
#[test]
fn test_config_validation_withSameLanguages_shouldStillBeValid() {
    let mut config = Config::default();
    config.source_language = "en".to_string();
    config.target_language = "eng".to_string();
    assert!(config.validate().is_ok());
}

/// Test that the None provider skips backend checks
#[test]
fn test_config_validation_withNoneProvider_shouldIgnoreBackendSettings() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    assert!(config.validate().is_ok());
}

/// Test serialization round trip keeps the provider table
#[test]
fn test_config_serialization_withDefaults_shouldRoundTrip() {
    let config = Config::default();
    let json = serde_json::to_string_pretty(&config).unwrap();
    assert!(json.contains("\"type\": \"ollama\""));
    assert!(json.contains("\"provider\": \"none\""));

    let parsed: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.translation.available_providers.len(), 2);
    assert_eq!(parsed.target_language, "zh-CN");
}

/// Test that partial provider entries fill missing fields
#[test]
fn test_config_parsing_withPartialProvider_shouldUseDefaults() {
    let json = r#"{
        "source_language": "en",
        "target_language": "fr",
        "translation": {
            "provider": "google",
            "available_providers": [
                { "type": "google", "endpoint": "http://localhost:9999/translate" }
            ]
        },
        "document": { "format": "markdown" }
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.translation.provider, TranslationProvider::Google);
    let google = config.translation.get_active_provider_config();
    assert_eq!(google.endpoint, "http://localhost:9999/translate");
    assert!(google.chunk_size > 0);
    assert_eq!(config.document.format, OutputFormat::Markdown);
    assert_eq!(config.document.title, "Bilingual Translation");
    assert!(config.validate().is_ok());
}

/// Test that a missing provider entry falls back to built-in defaults
#[test]
fn test_active_provider_config_withMissingEntry_shouldFallBackToDefaults() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.translation.provider = TranslationProvider::Google;

    let provider = config.translation.get_active_provider_config();
    let expected = ProviderConfig::new(TranslationProvider::Google);
    assert_eq!(provider.endpoint, expected.endpoint);
    assert_eq!(provider.chunk_threshold, 5000);
}

/// Test provider display names and identifiers
#[test]
fn test_translation_provider_display_withAllVariants_shouldBeLowercase() {
    assert_eq!(TranslationProvider::None.to_string(), "none");
    assert_eq!(TranslationProvider::Ollama.to_string(), "ollama");
    assert_eq!(TranslationProvider::Google.to_string(), "google");
    assert_eq!(TranslationProvider::Google.display_name(), "Google Translate");
}
