use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::app_config::OutputFormat;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path for the bilingual document
    // @params: input_file, output_dir, format
    /// `<output_dir>/<input stem>_translation.<ext>`
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        format: OutputFormat,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str("_translation.");
        output_filename.push_str(format.extension());

        output_dir.as_ref().join(output_filename)
    }

    /// Write a file through a temporary sibling that is renamed into place,
    /// so a failed write never leaves a truncated document behind.
    pub fn write_atomically<P, F>(path: P, write: F) -> Result<()>
    where
        P: AsRef<Path>,
        F: FnOnce(&mut File) -> Result<()>,
    {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&parent)?;

        let mut tmp = NamedTempFile::new_in(&parent)
            .with_context(|| format!("Failed to create temporary file in {:?}", parent))?;
        write(tmp.as_file_mut())?;
        tmp.as_file().sync_all()
            .with_context(|| format!("Failed to flush {:?}", path))?;
        tmp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write to file: {:?}", path))?;

        Ok(())
    }

    /// Write a string to a file atomically
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        use std::io::Write;

        Self::write_atomically(path, |file| {
            file.write_all(content.as_bytes())?;
            Ok(())
        })
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Whether the path names a PDF by extension
    pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
    }
}
