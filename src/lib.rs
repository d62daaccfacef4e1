/*!
 * # papertrans
 *
 * A Rust library that turns a PDF research paper into a bilingual document:
 * every paragraph of the original is followed by its translation.
 *
 * ## Features
 *
 * - Page text extraction from PDF files (lopdf)
 * - Paragraph segmentation and figure citation detection ("Fig. 2", "Figure 3a")
 * - Translation through pluggable backends:
 *   - none (placeholder text for manual translation)
 *   - Ollama (local LLM)
 *   - Google web translate
 * - Word-preserving chunking, retry with exponential backoff and
 *   length-based output validation
 * - DOCX or Markdown output with highlighted figure citations
 *
 * ## Architecture
 *
 * - `app_config`: Configuration management
 * - `extraction`: PDF page text
 * - `text`: segmentation, figure detection, chunking
 * - `providers`: HTTP clients for Ollama and Google
 * - `translation`: backends and the retrying translation service
 * - `document`: bilingual document composers
 * - `app_controller`: the end-to-end pipeline
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod text;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use document::{DocumentComposer, ParagraphRecord};
pub use errors::{AppError, ExtractionError, ProviderError, TranslationError};
pub use extraction::{PageText, PageTextExtractor};
pub use language_utils::{get_language_name, language_codes_match, validate_language_code};
pub use text::{FigureReference, FigureReferenceDetector, ParagraphSegmenter};
pub use translation::{TranslationResult, TranslationService};
