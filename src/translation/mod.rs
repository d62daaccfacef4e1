/*!
 * Paragraph translation.
 *
 * - `backend`: the Null, Ollama and Google backends behind one trait
 * - `core`: chunking, retry, backoff and output validation
 * - `cache`: reuse of complete translations for repeated text
 */

pub use self::backend::{
    BackendProfile, GoogleBackend, NullBackend, OllamaBackend, TranslationBackend,
    UNTRANSLATED_PLACEHOLDER,
};
pub use self::cache::TranslationCache;
pub use self::core::{ChunkTranslation, RetryPolicy, TranslationResult, TranslationService};

pub mod backend;
pub mod cache;
pub mod core;
