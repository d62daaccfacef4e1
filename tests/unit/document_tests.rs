/*!
 * Tests for bilingual document composition
 */

use anyhow::Result;

use papertrans::app_config::{DocumentConfig, OutputFormat};
use papertrans::document::{self, MarkdownComposer, ParagraphRecord, highlight_segments};
use papertrans::errors::{ProviderError, TranslationError};
use papertrans::text::FigureReferenceDetector;
use papertrans::translation::{ChunkTranslation, TranslationResult};
use crate::common;

fn chunk(text: &str) -> Result<ChunkTranslation, TranslationError> {
    Ok(ChunkTranslation { text: text.to_string(), attempts: 1, suspect: false })
}

fn record(page: u32, number: usize, original: &str, chunks: Vec<Result<ChunkTranslation, TranslationError>>) -> ParagraphRecord {
    ParagraphRecord {
        page_number: page,
        paragraph_number: number,
        original: original.to_string(),
        figure_refs: FigureReferenceDetector::new().detect(original),
        translation: TranslationResult::new(chunks, " "),
    }
}

/// Test highlighting keeps every character exactly once
#[test]
fn test_highlight_segments_withCitations_shouldCoverTextOnce() {
    let text = "Growth (Fig. 1) peaks early; Figure 2a and fig 3 disagree.";
    let refs = FigureReferenceDetector::new().detect(text);
    let segments = highlight_segments(text, &refs);

    let rebuilt: String = segments.iter().map(|s| s.text).collect();
    assert_eq!(rebuilt, text);

    let highlighted: Vec<&str> = segments.iter().filter(|s| s.highlighted).map(|s| s.text).collect();
    assert_eq!(highlighted, vec!["Fig. 1", "Figure 2a", "fig 3"]);
}

/// Test failed chunks render as visible markers
#[test]
fn test_translation_text_withFailedChunk_shouldShowMarker() {
    let failed = Err(TranslationError::Exhausted {
        attempts: 3,
        last: ProviderError::ConnectionError("connection refused".to_string()),
    });
    let record = record(1, 1, "Two chunk paragraph text.", vec![chunk("Erste Hälfte"), failed]);

    let text = record.translation_text();
    assert!(text.starts_with("Erste Hälfte [Translation failed: "));
    assert!(text.contains("connection refused"));
}

/// Test the Markdown layout for a two-page document
#[test]
fn test_markdown_render_withTwoPages_shouldFollowLayout() {
    let records = vec![
        record(1, 2, "Cells divide rapidly (Fig. 1).", vec![chunk("细胞迅速分裂（图1）。")]),
        record(1, 4, "A second paragraph on page one.", vec![chunk("第一页的第二段。")]),
        record(2, 1, "Results are summarised below.", vec![chunk("结果总结如下。")]),
    ];
    let config = DocumentConfig {
        title: "Foreign Literature Translation".to_string(),
        ..DocumentConfig::default()
    };
    let md = MarkdownComposer::new(config).render(&records);

    let page1 = md.find("## Page 1").unwrap();
    let para2 = md.find("### Paragraph 2").unwrap();
    let para4 = md.find("### Paragraph 4").unwrap();
    let page2 = md.find("## Page 2").unwrap();
    assert!(md.starts_with("# Foreign Literature Translation"));
    assert!(page1 < para2 && para2 < para4 && para4 < page2);

    assert!(md.contains("**Original:** Cells divide rapidly (**Fig. 1**)."));
    assert!(md.contains("**Translation:** 细胞迅速分裂（图1）。"));
    assert_eq!(md.matches("Insert the corresponding image").count(), 1);
    assert_eq!(md.matches(&"\\_".repeat(50)).count(), 3);
}

/// Test composer selection by format
#[test]
fn test_composer_for_withMarkdownFormat_shouldWriteMarkdown() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("out.md");
    let config = DocumentConfig { format: OutputFormat::Markdown, ..DocumentConfig::default() };

    let composer = document::composer_for(&config);
    composer.compose(&[record(3, 1, "Only paragraph here.", vec![chunk("Seul paragraphe.")])], &output)?;

    let written = std::fs::read_to_string(&output)?;
    assert!(written.contains("## Page 3"));
    Ok(())
}

/// Test composer selection for Word output
#[test]
fn test_composer_for_withDocxFormat_shouldWriteZipArchive() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("out.docx");

    let composer = document::composer_for(&DocumentConfig::default());
    composer.compose(&[record(1, 1, "See Figure 2 for the setup.", vec![chunk("见图2。")])], &output)?;

    let bytes = std::fs::read(&output)?;
    assert!(bytes.starts_with(b"PK"));
    Ok(())
}
