/*!
 * Text structuring for extracted PDF pages.
 *
 * - `segmenter`: splits raw page text into paragraphs
 * - `figures`: finds figure citations such as "Fig. 2" or "Figure 3a"
 * - `chunking`: word-preserving splits for backend length limits
 */

pub mod chunking;
pub mod figures;
pub mod segmenter;

pub use self::chunking::{chunk_text, wrap_words};
pub use self::figures::{FigureReference, FigureReferenceDetector};
pub use self::segmenter::{ParagraphSegmenter, is_substantial};
