use anyhow::Result;
use log::debug;
use std::fmt::Write as _;
use std::path::Path;

use super::{
    DocumentComposer, ORIGINAL_LABEL, ParagraphRecord, SEPARATOR_LINE, TRANSLATION_LABEL,
    group_by_page,
};
use crate::app_config::DocumentConfig;
use crate::file_utils::FileManager;

/// Writes the bilingual layout as Markdown; figure citations are bold
#[derive(Debug, Clone)]
pub struct MarkdownComposer {
    config: DocumentConfig,
}

impl MarkdownComposer {
    pub fn new(config: DocumentConfig) -> Self {
        Self { config }
    }

    /// Render the whole document to a string
    pub fn render(&self, records: &[ParagraphRecord]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", escape(&self.config.title));

        for (page_number, page_records) in group_by_page(records) {
            let _ = writeln!(out, "## Page {}\n", page_number);

            for record in page_records {
                self.render_record(&mut out, record);
            }
        }

        out
    }

    fn render_record(&self, out: &mut String, record: &ParagraphRecord) {
        let _ = writeln!(out, "### Paragraph {}\n", record.paragraph_number);

        let _ = write!(out, "**{}**", ORIGINAL_LABEL.trim_end());
        out.push(' ');
        for segment in record.original_segments() {
            if segment.highlighted {
                let _ = write!(out, "**{}**", escape(segment.text));
            } else {
                out.push_str(&escape(segment.text));
            }
        }
        out.push_str("\n\n");

        if record.has_figures() {
            let _ = writeln!(out, "*{}*\n", escape(&self.config.figure_placeholder));
        }

        let _ = writeln!(
            out,
            "**{}** {}\n",
            TRANSLATION_LABEL.trim_end(),
            escape(&record.translation_text())
        );
        let _ = writeln!(out, "{}\n", SEPARATOR_LINE.replace('_', "\\_"));
    }
}

impl DocumentComposer for MarkdownComposer {
    fn compose(&self, records: &[ParagraphRecord], output: &Path) -> Result<()> {
        FileManager::write_to_file(output, &self.render(records))?;
        debug!("Wrote {} paragraph(s) to {:?}", records.len(), output);
        Ok(())
    }
}

/// Backslash-escape characters Markdown would treat as inline markup
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>' | '#') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
