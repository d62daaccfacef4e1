use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::document::{self, ParagraphRecord};
use crate::errors::AppError;
use crate::extraction::{LopdfExtractor, PageText, PageTextExtractor};
use crate::file_utils::FileManager;
use crate::text::{FigureReferenceDetector, ParagraphSegmenter, is_substantial};
use crate::translation::TranslationService;

// @module: Application controller for PDF translation

/// Shared handle to a page extractor
pub type SharedExtractor = Arc<dyn PageTextExtractor + Send + Sync>;

/// Counts reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub pages: usize,
    pub paragraphs: usize,
    pub figure_paragraphs: usize,
    pub chunks: usize,
    pub failed_chunks: usize,
    pub suspect_chunks: usize,
    /// Time spent translating and writing, extraction excluded
    pub duration: Duration,
}

/// A kept paragraph waiting for translation
struct PendingParagraph {
    page_number: u32,
    paragraph_number: usize,
    text: String,
}

/// Main application controller: extract, segment, translate, compose
pub struct Controller {
    // @field: App configuration
    config: Config,
    extractor: SharedExtractor,
    translator: TranslationService,
    segmenter: ParagraphSegmenter,
    detector: FigureReferenceDetector,
}

impl Controller {
    // @method: Create a controller with lopdf extraction and the configured backend
    pub fn with_config(config: Config) -> Result<Self> {
        let translator = TranslationService::new(&config.translation)?;
        Ok(Self::with_components(config, Arc::new(LopdfExtractor::new()), translator))
    }

    /// Create a controller from explicit parts
    pub fn with_components(config: Config, extractor: SharedExtractor, translator: TranslationService) -> Self {
        Self {
            config,
            extractor,
            translator,
            segmenter: ParagraphSegmenter::new(),
            detector: FigureReferenceDetector::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn translator(&self) -> &TranslationService {
        &self.translator
    }

    /// Pre-flight check of the translation backend
    pub async fn test_connection(&self) -> Result<()> {
        self.translator.test_connection().await
    }

    /// Output path used when none is given: `<stem>_translation.<ext>` in the working directory
    pub fn default_output_path(&self, input_file: &Path) -> PathBuf {
        FileManager::generate_output_path(input_file, "", self.config.document.format)
    }

    /// Run the whole pipeline for one PDF
    pub async fn run(&self, input_file: &Path, output_path: Option<PathBuf>) -> Result<RunSummary> {
        let pages = self.extract_text(input_file).await?;
        self.run_with_pages(input_file, &pages, output_path).await
    }

    /// Check the input and extract its pages.
    ///
    /// Fails with `AppError::InputNotFound` or `AppError::NoText` before any
    /// translation backend is contacted.
    pub async fn extract_text(&self, input_file: &Path) -> Result<Vec<PageText>> {
        if !FileManager::file_exists(input_file) {
            return Err(AppError::InputNotFound(input_file.display().to_string()).into());
        }
        if !FileManager::is_pdf(input_file) {
            warn!("{:?} does not have a .pdf extension, trying anyway", input_file);
        }

        let extractor = Arc::clone(&self.extractor);
        let path = input_file.to_path_buf();

        // lopdf parsing is CPU-bound
        let pages = tokio::task::spawn_blocking(move || extractor.extract(&path))
            .await
            .map_err(|e| anyhow!("Extraction task panicked: {}", e))?
            .map_err(AppError::from)?;

        if pages.is_empty() {
            return Err(AppError::NoText(input_file.display().to_string()).into());
        }
        info!("Extracted text from {} page(s)", pages.len());
        Ok(pages)
    }

    /// Translate already extracted pages and write the document
    pub async fn run_with_pages(
        &self,
        input_file: &Path,
        pages: &[PageText],
        output_path: Option<PathBuf>,
    ) -> Result<RunSummary> {
        let start_time = Instant::now();
        let output_path = output_path.unwrap_or_else(|| self.default_output_path(input_file));

        info!(
            "Translating {} -> {} with {}",
            self.config.source_language,
            self.config.target_language,
            self.config.translation.provider.display_name()
        );
        let records = self.build_records(pages).await;

        let composer = document::composer_for(&self.config.document);
        let records_for_composer = records.clone();
        let output_for_composer = output_path.clone();
        tokio::task::spawn_blocking(move || composer.compose(&records_for_composer, &output_for_composer))
            .await
            .map_err(|e| anyhow!("Document task panicked: {}", e))?
            .with_context(|| format!("Failed to write {:?}", output_path))?;

        let summary = Self::summarize(&records, pages.len(), output_path, start_time.elapsed());
        self.log_summary(&summary);
        Ok(summary)
    }

    /// Segment every page, keep substantial paragraphs and translate them in order
    pub async fn build_records(&self, pages: &[PageText]) -> Vec<ParagraphRecord> {
        let pending = self.collect_paragraphs(pages);
        let progress_bar = Self::progress_bar(pending.len() as u64);
        progress_bar.set_message("Translating");

        let mut records = Vec::with_capacity(pending.len());
        for paragraph in pending {
            debug!("Translating page {} paragraph {}", paragraph.page_number, paragraph.paragraph_number);

            let translation = self.translator
                .translate(&paragraph.text, &self.config.source_language, &self.config.target_language)
                .await;
            if !translation.is_complete() {
                warn!(
                    "Page {} paragraph {}: {} chunk(s) left untranslated",
                    paragraph.page_number,
                    paragraph.paragraph_number,
                    translation.failures().count()
                );
            }

            records.push(ParagraphRecord {
                page_number: paragraph.page_number,
                paragraph_number: paragraph.paragraph_number,
                figure_refs: self.detector.detect(&paragraph.text),
                original: paragraph.text,
                translation,
            });
            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();
        records
    }

    fn collect_paragraphs(&self, pages: &[PageText]) -> Vec<PendingParagraph> {
        let min_chars = self.config.document.min_paragraph_chars;
        let mut pending = Vec::new();

        for page in pages {
            let paragraphs = self.segmenter.segment(&page.content);
            let before = pending.len();

            for (index, text) in paragraphs.into_iter().enumerate() {
                if is_substantial(&text, min_chars) {
                    pending.push(PendingParagraph {
                        page_number: page.page_number,
                        paragraph_number: index + 1,
                        text,
                    });
                }
            }
            debug!("Page {}: {} paragraph(s) kept", page.page_number, pending.len() - before);
        }

        pending
    }

    fn progress_bar(len: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} paragraphs ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    fn summarize(records: &[ParagraphRecord], pages: usize, output_path: PathBuf, duration: Duration) -> RunSummary {
        RunSummary {
            output_path,
            pages,
            paragraphs: records.len(),
            figure_paragraphs: records.iter().filter(|r| r.has_figures()).count(),
            chunks: records.iter().map(|r| r.translation.chunks.len()).sum(),
            failed_chunks: records.iter().map(|r| r.translation.failures().count()).sum(),
            suspect_chunks: records.iter().map(|r| r.translation.suspect_count()).sum(),
            duration,
        }
    }

    fn log_summary(&self, summary: &RunSummary) {
        info!(
            "Wrote {:?}: {} paragraph(s) from {} page(s), {} citing figures",
            summary.output_path, summary.paragraphs, summary.pages, summary.figure_paragraphs
        );
        if summary.failed_chunks > 0 {
            warn!("{} of {} chunk(s) could not be translated", summary.failed_chunks, summary.chunks);
        }
        if summary.suspect_chunks > 0 {
            warn!("{} chunk(s) may be incomplete translations", summary.suspect_chunks);
        }
        let (hits, _, _) = self.translator.cache().stats();
        if hits > 0 {
            debug!("{} paragraph(s) served from cache", hits);
        }
        info!("Done in {}", Self::format_duration(summary.duration));
    }

    // Format duration in a human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
