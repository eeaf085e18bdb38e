//! Extracting every PDF in a folder.
//!
//! One failing file does not stop the rest; each outcome is reported in
//! the returned [`BatchReport`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::ExtractError;
use crate::extractor::{Extraction, Extractor};

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("PDF folder does not exist: {}", .0.display())]
    MissingDir(PathBuf),

    #[error("failed to read PDF folder {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no PDFs found in folder: {}", .0.display())]
    NoPdfs(PathBuf),
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Regular files in `dir` with a `.pdf` extension (any case), sorted by
/// name. Subdirectories are not searched.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::MissingDir(dir.to_owned()));
    }
    let read_err = |source: io::Error| BatchError::ReadDir {
        path: dir.to_owned(),
        source,
    };

    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if entry.file_type().map_err(read_err)?.is_file() && is_pdf(&path) {
            pdfs.push(path);
        }
    }
    if pdfs.is_empty() {
        return Err(BatchError::NoPdfs(dir.to_owned()));
    }
    pdfs.sort();
    Ok(pdfs)
}

/// `statement.PDF` -> `<output_dir>/statement_extracted.txt`
pub fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{}_extracted.txt", stem))
}

#[derive(Debug)]
pub struct BatchReport {
    pub extracted: Vec<Extraction>,
    pub failed: Vec<(PathBuf, ExtractError)>,
}

impl Extractor {
    /// Extracts every PDF in `input_dir` into `output_dir`.
    ///
    /// Only discovery errors are returned as `Err`. Per-file failures are
    /// logged and collected in [`BatchReport::failed`].
    pub fn extract_dir(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<BatchReport, BatchError> {
        let output_dir = output_dir.as_ref();
        let pdfs = discover_pdfs(input_dir.as_ref())?;
        info!("found {} PDF file(s) to process", pdfs.len());

        let mut report = BatchReport {
            extracted: Vec::with_capacity(pdfs.len()),
            failed: Vec::new(),
        };
        for (i, pdf) in pdfs.into_iter().enumerate() {
            info!("processing file {}: {}", i + 1, pdf.display());
            let output = output_path(output_dir, &pdf);
            match self.extract(&pdf, &output) {
                Ok(done) => report.extracted.push(done),
                Err(e) => {
                    warn!("skipping {}: {}", pdf.display(), e);
                    report.failed.push((pdf, e));
                }
            }
        }
        Ok(report)
    }
}
