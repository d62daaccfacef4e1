/*!
 * Word-preserving chunking for translation length limits.
 *
 * Lengths are counted in chars. A word is never broken: one that is longer
 * than the width on its own becomes a chunk of its own.
 */

/// Greedy word wrap: pack whitespace-separated words into lines of at most
/// `width` chars, joined by single spaces.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len > width {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Split `text` for a backend. Text no longer than `threshold` chars is
/// returned untouched as a single chunk; longer text is wrapped to
/// `chunk_size`.
pub fn chunk_text(text: &str, threshold: usize, chunk_size: usize) -> Vec<String> {
    if text.chars().count() <= threshold {
        return vec![text.to_string()];
    }
    wrap_words(text, chunk_size)
}
