/*!
 * Figure reference detection.
 *
 * Several case-insensitive patterns are scanned independently over the
 * paragraph. Their match sets overlap heavily ("Figure 3" satisfies more
 * than one), so the collected spans are sorted and overlapping spans are
 * merged into their union. The result never overlaps and is strictly
 * ordered by start offset, which is what highlighting needs.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Citation patterns, applied in order
static FIGURE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)Fig(?:ure)?\s*\.?\s*\d+[a-zA-Z]*",
        r"(?i)Figure\s+\d+[a-zA-Z]*",
        r"(?i)Figure\s*\d+[a-zA-Z]*",
        r"(?i)Fig\.\s*\d+[a-zA-Z]*",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("figure pattern should compile"))
    .collect()
});

/// A figure citation inside one paragraph.
///
/// `start` and `end` are byte offsets into the paragraph, always on char
/// boundaries, so `&paragraph[start..end] == matched_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureReference {
    pub matched_text: String,
    pub start: usize,
    pub end: usize,
}

/// Finds figure citations in paragraph text
#[derive(Debug, Default, Clone, Copy)]
pub struct FigureReferenceDetector;

impl FigureReferenceDetector {
    pub fn new() -> Self {
        Self
    }

    /// Every match of every pattern, sorted by start (longest first on ties).
    /// Overlaps are left in place.
    pub fn scan(&self, text: &str) -> Vec<(usize, usize)> {
        let mut spans: Vec<(usize, usize)> = FIGURE_PATTERNS
            .iter()
            .flat_map(|pattern| pattern.find_iter(text).map(|m| (m.start(), m.end())))
            .collect();
        spans.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
        spans
    }

    /// Detect figure references, ordered by start offset and non-overlapping
    pub fn detect(&self, text: &str) -> Vec<FigureReference> {
        merge_spans(self.scan(text))
            .into_iter()
            .map(|(start, end)| FigureReference {
                matched_text: text[start..end].to_string(),
                start,
                end,
            })
            .collect()
    }
}

/// Merge sorted spans that overlap into their union
fn merge_spans(sorted: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(sorted.len());
    for (start, end) in sorted {
        match merged.last_mut() {
            Some(last) if start < last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}
