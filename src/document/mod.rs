/*!
 * Bilingual document composition.
 *
 * The controller produces one `ParagraphRecord` per kept paragraph, in page
 * and paragraph order. Composers turn that stream into an output file:
 *
 * - `docx`: Word document via `docx-rs`
 * - `markdown`: plain Markdown
 *
 * Both render the same layout: title, a heading per page, a heading per
 * paragraph, the original text with figure citations highlighted, an
 * optional figure placeholder, the translation and a separator.
 */

use anyhow::Result;
use std::path::Path;

use crate::app_config::{DocumentConfig, OutputFormat};
use crate::errors::TranslationError;
use crate::text::FigureReference;
use crate::translation::TranslationResult;

pub mod docx;
pub mod markdown;

pub use self::docx::DocxComposer;
pub use self::markdown::MarkdownComposer;

/// Label before the source paragraph
pub const ORIGINAL_LABEL: &str = "Original: ";
/// Label before the translation
pub const TRANSLATION_LABEL: &str = "Translation: ";
/// Closes every paragraph block
pub const SEPARATOR_LINE: &str = "__________________________________________________";

/// One translated paragraph ready for layout
#[derive(Debug, Clone)]
pub struct ParagraphRecord {
    /// 1-based page number
    pub page_number: u32,
    /// 1-based position among the page's paragraphs, counted before short
    /// fragments were dropped
    pub paragraph_number: usize,
    pub original: String,
    pub figure_refs: Vec<FigureReference>,
    pub translation: TranslationResult,
}

impl ParagraphRecord {
    pub fn has_figures(&self) -> bool {
        !self.figure_refs.is_empty()
    }

    /// Translation text with failed chunks replaced by a visible marker
    pub fn translation_text(&self) -> String {
        self.translation.render(failure_marker)
    }

    /// Original text cut into plain and highlighted runs
    pub fn original_segments(&self) -> Vec<Segment<'_>> {
        highlight_segments(&self.original, &self.figure_refs)
    }
}

/// Marker written in place of a chunk that could not be translated
pub fn failure_marker(error: &TranslationError) -> String {
    let TranslationError::Exhausted { last, .. } = error;
    format!("[Translation failed: {}]", last)
}

/// A run of paragraph text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

/// Split `text` into alternating plain and highlighted runs.
///
/// References are expected in start order. Overlapping references are
/// tolerated: the part already emitted is skipped, so no text is repeated.
pub fn highlight_segments<'a>(text: &'a str, refs: &[FigureReference]) -> Vec<Segment<'a>> {
    let mut segments = Vec::with_capacity(refs.len() * 2 + 1);
    let mut cursor = 0;

    for reference in refs {
        let end = reference.end.min(text.len());
        if end <= cursor {
            continue;
        }
        let start = reference.start.max(cursor);
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            continue;
        }

        if start > cursor {
            segments.push(Segment { text: &text[cursor..start], highlighted: false });
        }
        segments.push(Segment { text: &text[start..end], highlighted: true });
        cursor = end;
    }

    if cursor < text.len() {
        segments.push(Segment { text: &text[cursor..], highlighted: false });
    }

    segments
}

/// Renders paragraph records into an output file
pub trait DocumentComposer {
    /// Write the whole document to `output`, replacing any existing file
    fn compose(&self, records: &[ParagraphRecord], output: &Path) -> Result<()>;
}

/// Composer for the configured format
pub fn composer_for(config: &DocumentConfig) -> Box<dyn DocumentComposer + Send + Sync> {
    match config.format {
        OutputFormat::Docx => Box::new(DocxComposer::new(config.clone())),
        OutputFormat::Markdown => Box::new(MarkdownComposer::new(config.clone())),
    }
}

/// Consecutive records grouped by page number
pub(crate) fn group_by_page(records: &[ParagraphRecord]) -> Vec<(u32, &[ParagraphRecord])> {
    records
        .chunk_by(|a, b| a.page_number == b.page_number)
        .map(|group| (group[0].page_number, group))
        .collect()
}
