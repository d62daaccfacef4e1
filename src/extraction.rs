/*!
 * Page text extraction from PDF files.
 *
 * PDF parsing itself is delegated to `lopdf`; this module only turns its
 * per-page output into an ordered list of `PageText`. A page that fails to
 * extract is logged and skipped so one broken page never sinks the job.
 */

use log::{debug, warn};
use std::path::Path;

use crate::errors::ExtractionError;

/// Raw text of one PDF page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number
    pub page_number: u32,
    /// Text as produced by the extractor, line breaks included
    pub content: String,
}

/// Source of page-indexed text
pub trait PageTextExtractor {
    /// Extract every page with text, ordered by page number.
    ///
    /// Fails only when the document as a whole cannot be read.
    fn extract(&self, path: &Path) -> Result<Vec<PageText>, ExtractionError>;
}

/// `PageTextExtractor` backed by lopdf
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl PageTextExtractor for LopdfExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<PageText>, ExtractionError> {
        let document = lopdf::Document::load(path)
            .map_err(|e| ExtractionError::Load(format!("{}: {}", path.display(), e)))?;

        let pages = document.get_pages();
        debug!("PDF {:?} has {} page(s)", path, pages.len());

        let results = pages.keys().map(|&page_number| {
            let text = document
                .extract_text(&[page_number])
                .map_err(|e| ExtractionError::Page {
                    page: page_number,
                    message: e.to_string(),
                });
            (page_number, text)
        });

        Ok(collect_pages(results))
    }
}

/// Keep pages that produced text, skipping failures, sorted by page number.
///
/// The sort is stable, so pages with equal numbers keep extraction order.
pub fn collect_pages<I>(results: I) -> Vec<PageText>
where
    I: IntoIterator<Item = (u32, Result<String, ExtractionError>)>,
{
    let mut pages: Vec<PageText> = results
        .into_iter()
        .filter_map(|(page_number, result)| match result {
            Ok(content) if !content.trim().is_empty() => Some(PageText { page_number, content }),
            Ok(_) => {
                debug!("Page {} has no extractable text", page_number);
                None
            }
            Err(e) => {
                warn!("Skipping page {}: {}", page_number, e);
                None
            }
        })
        .collect();

    pages.sort_by_key(|page| page.page_number);
    pages
}
