//! Open, unlock, extract, write.
//!
//! One call to [`Extractor::extract`] walks
//! `Start → Opened → [Decrypting → Decrypted | DecryptFailed] → Extracting → Written`
//! and stops at the first failure. Nothing is written until every page has
//! been extracted.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::credentials::Credentials;
use crate::document::{Document, PdfDocument};
use crate::error::{ExtractError, Result};

/// What to do with an encrypted document when decryption is not enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockedPolicy {
    /// Go straight to extraction. A document that cannot be read without a
    /// password then fails with [`ExtractError::PageTree`].
    Proceed,
    /// Refuse with [`ExtractError::Locked`] before touching any page.
    FailFast,
}

impl Default for LockedPolicy {
    fn default() -> Self {
        LockedPolicy::Proceed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Opened,
    Decrypting,
    Decrypted,
    DecryptFailed,
    Extracting,
    Written,
}

fn enter(stage: Stage) {
    debug!("stage: {:?}", stage);
}

/// Text of a whole document, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub pages: usize,
    /// Variable name of the password that unlocked the document, if any.
    pub decrypted_with: Option<&'static str>,
}

/// Summary of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub pages: usize,
    pub decrypted_with: Option<&'static str>,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct Extractor {
    credentials: Credentials,
    policy: LockedPolicy,
}

impl Extractor {
    pub fn new(credentials: Credentials) -> Self {
        Extractor {
            credentials,
            policy: LockedPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: LockedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Extracts the text of every page of `input` into `output`.
    ///
    /// `output` is overwritten on success and left untouched on failure.
    pub fn extract(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<Extraction> {
        let (input, output) = (input.as_ref(), output.as_ref());

        let data = read_input(input)?;
        let mut doc = PdfDocument::parse(data).map_err(ExtractError::Parse)?;
        enter(Stage::Opened);

        let rendered = self.render(&mut doc)?;
        write_output(output, &rendered.text)?;
        enter(Stage::Written);

        info!("text extracted and saved to {}", output.display());
        Ok(Extraction {
            pages: rendered.pages,
            decrypted_with: rendered.decrypted_with,
            output: output.to_path_buf(),
        })
    }

    /// Unlocks `doc` if needed and renders all of its pages.
    pub fn render<D: Document>(&self, doc: &mut D) -> Result<Rendered> {
        let decrypted_with = self.unlock(doc)?;

        enter(Stage::Extracting);
        let pages = doc.page_count().map_err(ExtractError::PageTree)?;
        let mut blocks = Vec::with_capacity(pages);
        for index in 0..pages {
            let text = doc
                .page_text(index)
                .map_err(|source| ExtractError::Page {
                    page: index + 1,
                    source,
                })?
                .unwrap_or_default();
            blocks.push(page_block(index + 1, &text));
        }

        Ok(Rendered {
            text: blocks.join("\n"),
            pages,
            decrypted_with,
        })
    }

    fn unlock<D: Document>(&self, doc: &mut D) -> Result<Option<&'static str>> {
        if !doc.is_encrypted() {
            info!("PDF is not encrypted");
            return Ok(None);
        }
        if !self.credentials.decryption_enabled() {
            return match self.policy {
                LockedPolicy::FailFast => Err(ExtractError::Locked),
                LockedPolicy::Proceed => {
                    warn!("PDF is encrypted but PASS_CC is not set, extracting without decrypting");
                    Ok(None)
                }
            };
        }

        enter(Stage::Decrypting);
        for credential in self.credentials.iter() {
            match doc.decrypt(credential.secret()) {
                Ok(true) => {
                    enter(Stage::Decrypted);
                    info!("decrypted with password from {}", credential.source);
                    return Ok(Some(credential.source));
                }
                Ok(false) => debug!("password from {} rejected", credential.source),
                Err(e) => warn!("error decrypting with password from {}: {}", credential.source, e),
            }
        }

        enter(Stage::DecryptFailed);
        Err(ExtractError::DecryptionFailed {
            attempts: self.credentials.len(),
        })
    }
}

/// Header line plus text for one page; `number` is 1-based.
pub fn page_block(number: usize, text: &str) -> String {
    format!("--- Page {} ---\n{}\n", number, text)
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    let read_err = |source: io::Error| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ExtractError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(read_err(e)),
    };
    let mut data = Vec::new();
    file.read_to_end(&mut data).map_err(read_err)?;
    Ok(data)
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    let write_err = |source: io::Error| ExtractError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
    }
    fs::write(path, text).map_err(write_err)
}
