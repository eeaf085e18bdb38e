//! Error types for opening, unlocking and extracting a document.

use std::io;
use std::path::PathBuf;

use pdf::error::PdfError;

/// Failures raised by a [`Document`](crate::document::Document) backend.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The PDF library rejected the data.
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// Page content was requested while the document is still encrypted.
    #[error("document is encrypted and has not been unlocked")]
    Locked,

    /// The page index is past the end of the document.
    #[error("page index {0} is out of range")]
    MissingPage(usize),
}

/// Why a single extraction did not produce an output file.
///
/// Every variant is reported before anything is written, so a failed
/// extraction never leaves partial output behind.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("input file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse PDF: {0}")]
    Parse(#[source] DocumentError),

    /// The document is encrypted, no credentials were offered, and the
    /// policy forbids attempting extraction anyway.
    #[error("document is encrypted and decryption is not enabled")]
    Locked,

    #[error("failed to decrypt PDF with any of {attempts} password(s)")]
    DecryptionFailed { attempts: usize },

    #[error("failed to read the page tree: {0}")]
    PageTree(#[source] DocumentError),

    #[error("failed to extract text from page {page}: {source}")]
    Page {
        /// 1-based page number.
        page: usize,
        #[source]
        source: DocumentError,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
