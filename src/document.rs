//! Parsed documents and the operations extraction needs from them.

use std::convert::TryFrom;

use log::debug;
use pdf::error::PdfError;
use pdf::file::{CachedFile, FileOptions};

use crate::error::DocumentError;
use crate::text;

/// What the extractor needs from a parsed PDF.
pub trait Document {
    /// Whether the document carries an encryption dictionary.
    fn is_encrypted(&self) -> bool;

    /// Tries one password. `Ok(false)` means the password was wrong; `Err`
    /// means the attempt itself failed.
    fn decrypt(&mut self, password: &str) -> Result<bool, DocumentError>;

    fn page_count(&self) -> Result<usize, DocumentError>;

    /// Text of the page at `index` (0-based). `None` when the page has
    /// nothing to extract.
    fn page_text(&self, index: usize) -> Result<Option<String>, DocumentError>;
}

type PdfFile = CachedFile<Vec<u8>>;

/// Whether `e` is a rejected password. The `pdf` crate wraps the error in
/// `Try` (and `Shared` when it went through a cache) on its way out.
fn is_invalid_password(e: &PdfError) -> bool {
    match e {
        PdfError::InvalidPassword => true,
        PdfError::Try { source, .. } => is_invalid_password(source),
        PdfError::Shared { source } => is_invalid_password(source),
        _ => false,
    }
}

/// A [`Document`] backed by the `pdf` crate.
///
/// The raw bytes are kept so the file can be reloaded with a password.
/// A document whose user password is not empty cannot be loaded at all
/// until [`decrypt`](Document::decrypt) succeeds.
pub struct PdfDocument {
    data: Vec<u8>,
    encrypted: bool,
    file: Option<PdfFile>,
}

impl PdfDocument {
    pub fn parse(data: Vec<u8>) -> Result<Self, DocumentError> {
        match FileOptions::cached().load(data.clone()) {
            Ok(file) => {
                let encrypted = file.trailer.encrypt_dict.is_some();
                Ok(PdfDocument {
                    data,
                    encrypted,
                    file: Some(file),
                })
            }
            Err(e) if is_invalid_password(&e) => {
                debug!("document needs a password to open");
                Ok(PdfDocument {
                    data,
                    encrypted: true,
                    file: None,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn unlocked(&self) -> Result<&PdfFile, DocumentError> {
        self.file.as_ref().ok_or(DocumentError::Locked)
    }
}

impl Document for PdfDocument {
    fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    fn decrypt(&mut self, password: &str) -> Result<bool, DocumentError> {
        match FileOptions::cached()
            .password(password.as_bytes())
            .load(self.data.clone())
        {
            Ok(file) => {
                self.file = Some(file);
                Ok(true)
            }
            Err(e) if is_invalid_password(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn page_count(&self) -> Result<usize, DocumentError> {
        Ok(self.unlocked()?.num_pages() as usize)
    }

    fn page_text(&self, index: usize) -> Result<Option<String>, DocumentError> {
        let file = self.unlocked()?;
        let nr = match u32::try_from(index) {
            Ok(nr) if nr < file.num_pages() => nr,
            _ => return Err(DocumentError::MissingPage(index)),
        };
        let page = file.get_page(nr)?;
        Ok(text::page_text(&page, file)?)
    }
}
