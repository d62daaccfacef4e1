/*!
 * Word output.
 *
 * Body text is 12pt Times New Roman with SimSun for East Asian scripts.
 * Figure citations are bold red; page headings are navy.
 */

use anyhow::{Result, anyhow};
use docx_rs::{AlignmentType, Docx, Paragraph, Run, RunFonts, Style, StyleType};
use log::debug;
use std::path::Path;

use super::{
    DocumentComposer, ORIGINAL_LABEL, ParagraphRecord, SEPARATOR_LINE, TRANSLATION_LABEL,
    group_by_page,
};
use crate::app_config::DocumentConfig;
use crate::file_utils::FileManager;

const LATIN_FONT: &str = "Times New Roman";
const EAST_ASIA_FONT: &str = "SimSun";
/// Half-points
const BODY_SIZE: usize = 24;
const HIGHLIGHT_COLOR: &str = "FF0000";
const PAGE_HEADING_COLOR: &str = "000080";

/// Writes `.docx` files
#[derive(Debug, Clone)]
pub struct DocxComposer {
    config: DocumentConfig,
}

impl DocxComposer {
    pub fn new(config: DocumentConfig) -> Self {
        Self { config }
    }

    /// Build the document in memory
    pub fn build(&self, records: &[ParagraphRecord]) -> Docx {
        let mut docx = Docx::new()
            .add_style(heading_style("Heading1", "heading 1", 32))
            .add_style(heading_style("Heading2", "heading 2", 28).color(PAGE_HEADING_COLOR))
            .add_style(heading_style("Heading3", "heading 3", 26))
            .add_paragraph(
                Paragraph::new()
                    .add_run(text_run(&self.config.title))
                    .style("Heading1")
                    .align(AlignmentType::Center),
            );

        for (page_number, page_records) in group_by_page(records) {
            docx = docx.add_paragraph(
                Paragraph::new()
                    .add_run(text_run(&format!("Page {}", page_number)))
                    .style("Heading2"),
            );

            for record in page_records {
                docx = self.add_record(docx, record);
            }
        }

        docx
    }

    fn add_record(&self, docx: Docx, record: &ParagraphRecord) -> Docx {
        let heading = Paragraph::new()
            .add_run(text_run(&format!("Paragraph {}", record.paragraph_number)))
            .style("Heading3");

        let mut original = Paragraph::new().add_run(text_run(ORIGINAL_LABEL).bold());
        for segment in record.original_segments() {
            let run = text_run(segment.text);
            original = original.add_run(if segment.highlighted {
                run.bold().color(HIGHLIGHT_COLOR)
            } else {
                run
            });
        }

        let mut docx = docx.add_paragraph(heading).add_paragraph(original);

        if record.has_figures() {
            docx = docx.add_paragraph(
                Paragraph::new()
                    .add_run(text_run(&self.config.figure_placeholder).bold())
                    .align(AlignmentType::Center),
            );
        }

        let translation = Paragraph::new()
            .add_run(text_run(TRANSLATION_LABEL).bold())
            .add_run(text_run(&record.translation_text()));

        docx.add_paragraph(translation)
            .add_paragraph(Paragraph::new().add_run(text_run(SEPARATOR_LINE)))
    }
}

impl DocumentComposer for DocxComposer {
    fn compose(&self, records: &[ParagraphRecord], output: &Path) -> Result<()> {
        let docx = self.build(records);
        FileManager::write_atomically(output, |file| {
            docx.build()
                .pack(file)
                .map_err(|e| anyhow!("Failed to pack DOCX: {}", e))
        })?;
        debug!("Wrote {} paragraph(s) to {:?}", records.len(), output);
        Ok(())
    }
}

fn text_run(text: &str) -> Run {
    Run::new()
        .add_text(text)
        .size(BODY_SIZE)
        .fonts(RunFonts::new().ascii(LATIN_FONT).hi_ansi(LATIN_FONT).east_asia(EAST_ASIA_FONT))
}

fn heading_style(id: &str, name: &str, size: usize) -> Style {
    Style::new(id, StyleType::Paragraph)
        .name(name)
        .size(size)
        .bold()
}
