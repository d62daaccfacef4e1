use anyhow::{anyhow, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::time::Duration;

use crate::errors::AppError;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO, region subtag allowed)
    pub source_language: String,

    /// Target language code (ISO, region subtag allowed)
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Output document config
    #[serde(default)]
    pub document: DocumentConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: No translation, placeholder only
    #[default]
    None,
    // @provider: Local Ollama server
    Ollama,
    // @provider: Google web translate endpoint
    Google,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::None => "No translation",
            Self::Ollama => "Ollama",
            Self::Google => "Google Translate",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::None => "none".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::Google => "google".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "ollama" | "local" => Ok(Self::Ollama),
            "google" | "remote" => Ok(Self::Google),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Per-backend settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name (Ollama only)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Per-attempt timeout seconds
    #[serde(default = "default_ollama_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Texts longer than this (chars) are split into chunks
    #[serde(default = "default_ollama_chunk_threshold")]
    pub chunk_threshold: usize,

    // @field: Max chars per chunk once splitting kicks in
    #[serde(default = "default_ollama_chunk_size")]
    pub chunk_size: usize,

    // @field: Max chunks of one paragraph in flight
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    // @field: Fixed pause before every request, in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::None => Self {
                provider_type: "none".to_string(),
                model: String::new(),
                endpoint: String::new(),
                timeout_secs: 0,
                chunk_threshold: usize::MAX,
                chunk_size: usize::MAX,
                concurrent_requests: default_concurrent_requests(),
                request_delay_ms: 0,
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_ollama_timeout_secs(),
                chunk_threshold: default_ollama_chunk_threshold(),
                chunk_size: default_ollama_chunk_size(),
                concurrent_requests: default_concurrent_requests(),
                request_delay_ms: 0,
            },
            TranslationProvider::Google => Self {
                provider_type: "google".to_string(),
                model: String::new(),
                endpoint: default_google_endpoint(),
                timeout_secs: default_google_timeout_secs(),
                chunk_threshold: default_google_chunk_threshold(),
                chunk_size: default_google_chunk_size(),
                concurrent_requests: default_concurrent_requests(),
                request_delay_ms: default_google_request_delay_ms(),
            },
        }
    }

    /// Per-attempt timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation backend to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Settings for every known backend
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all backends
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Prompt template for the local model
    /// Placeholders: {source_language}, {target_language}, {text}
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,

    /// Maximum attempts per chunk, first try included
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Initial backoff in milliseconds, doubled after each failed attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Translations shorter than this fraction of the source are suspect
    #[serde(default = "default_min_length_ratio")]
    pub min_length_ratio: f64,

    /// Reuse translations of identical paragraphs within one run
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            prompt_template: default_prompt_template(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            min_length_ratio: default_min_length_ratio(),
            cache_enabled: true,
        }
    }
}

/// Output document format
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Docx,
    Markdown,
}

impl OutputFormat {
    /// File extension used for derived output paths
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Markdown => "md",
        }
    }
}

/// Settings for the composed bilingual document
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DocumentConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Document title
    #[serde(default = "default_title")]
    pub title: String,

    /// Paragraphs shorter than this (after trimming) are skipped, e.g. page numbers
    #[serde(default = "default_min_paragraph_chars")]
    pub min_paragraph_chars: usize,

    /// Shown after a paragraph that cites a figure
    #[serde(default = "default_figure_placeholder")]
    pub figure_placeholder: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            title: default_title(),
            min_paragraph_chars: default_min_paragraph_chars(),
            figure_placeholder: default_figure_placeholder(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_concurrent_requests() -> usize {
    1
}

fn default_ollama_timeout_secs() -> u64 {
    60
}

fn default_google_timeout_secs() -> u64 {
    30
}

fn default_ollama_chunk_threshold() -> usize {
    1000
}

fn default_ollama_chunk_size() -> usize {
    1000
}

fn default_google_chunk_threshold() -> usize {
    5000
}

fn default_google_chunk_size() -> usize {
    4500
}

fn default_google_request_delay_ms() -> u64 {
    500
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_min_length_ratio() -> f64 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_ollama_model() -> String {
    "llama3".to_string()
}

fn default_prompt_template() -> String {
    "Translate the following {source_language} text into standard academic {target_language}. \
     Be precise and complete, keep a professional register and do not leave anything out:\n\n\
     {text}\n\n\
     Return only the {target_language} translation, without the original text or any extra explanation."
        .to_string()
}

fn default_title() -> String {
    "Bilingual Translation".to_string()
}

fn default_min_paragraph_chars() -> usize {
    10
}

fn default_figure_placeholder() -> String {
    "[Figure] Insert the corresponding image and caption here".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values.
    ///
    /// Failures are `AppError::Config`.
    pub fn validate(&self) -> Result<()> {
        for code in [&self.source_language, &self.target_language] {
            language_utils::validate_language_code(code)
                .map_err(|e| AppError::Config(e.to_string()))?;
        }
        if language_utils::language_codes_match(&self.source_language, &self.target_language) {
            warn!(
                "Source and target language are both '{}', the translation will mirror the original",
                self.target_language
            );
        }

        let common = &self.translation.common;
        if common.retry_count == 0 {
            return Err(config_error("retry_count must allow at least one attempt".to_string()));
        }
        if !(0.0..=1.0).contains(&common.min_length_ratio) {
            return Err(config_error(format!(
                "min_length_ratio must be between 0 and 1, got {}",
                common.min_length_ratio
            )));
        }

        if self.translation.provider != TranslationProvider::None {
            let provider = self.translation.get_active_provider_config();
            if provider.chunk_size == 0 {
                return Err(config_error(format!("chunk_size for {} must be positive", self.translation.provider)));
            }
            if provider.endpoint.is_empty() {
                return Err(config_error(format!("endpoint for {} must not be empty", self.translation.provider)));
            }
            if self.translation.provider == TranslationProvider::Ollama && provider.model.is_empty() {
                return Err(config_error("A model name is required for the Ollama provider".to_string()));
            }
        }

        Ok(())
    }
}

fn config_error(message: String) -> anyhow::Error {
    AppError::Config(message).into()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "zh-CN".to_string(),
            translation: TranslationConfig::default(),
            document: DocumentConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Settings of the active backend, falling back to built-in defaults
    pub fn get_active_provider_config(&self) -> ProviderConfig {
        self.get_provider_config(&self.provider)
            .cloned()
            .unwrap_or_else(|| ProviderConfig::new(self.provider))
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access used by CLI overrides; inserts defaults when missing
    pub fn provider_config_mut(&mut self, provider_type: TranslationProvider) -> &mut ProviderConfig {
        let provider_str = provider_type.to_lowercase_string();
        let index = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(provider_type));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        self.get_active_provider_config().model
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::Google),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
