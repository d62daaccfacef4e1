/*!
 * Paragraph segmentation.
 *
 * Text coming out of a PDF page keeps the visual line breaks of the layout.
 * Consecutive non-blank lines belong to the same paragraph and are rejoined
 * with single spaces; one or more blank lines end a paragraph.
 */

/// Splits raw page text into paragraphs
#[derive(Debug, Default, Clone, Copy)]
pub struct ParagraphSegmenter;

impl ParagraphSegmenter {
    /// Create a new segmenter
    pub fn new() -> Self {
        Self
    }

    /// Segment raw text into ordered, non-empty paragraphs
    pub fn segment(&self, raw_text: &str) -> Vec<String> {
        let mut paragraphs = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in raw_text.lines() {
            let line = line.trim();
            if line.is_empty() {
                if !current.is_empty() {
                    paragraphs.push(current.join(" "));
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }

        if !current.is_empty() {
            paragraphs.push(current.join(" "));
        }

        paragraphs
    }
}

/// Whether a paragraph is long enough to be worth translating.
///
/// Short fragments are usually page numbers or running headers.
pub fn is_substantial(paragraph: &str, min_chars: usize) -> bool {
    paragraph.trim().chars().count() >= min_chars
}
