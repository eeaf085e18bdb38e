//! Extracts the text of a possibly password-protected PDF into a plain text
//! file, one `--- Page N ---` block per page.
//!
//! ```no_run
//! use pdf_unlock_text::{Credentials, Extractor};
//!
//! let extractor = Extractor::new(Credentials::from_env());
//! match extractor.extract("statement.pdf", "statement.txt") {
//!     Ok(done) => println!("{} pages", done.pages),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```
//!
//! [`Extractor::extract_dir`] does the same for every PDF in a folder.

pub mod batch;
pub mod credentials;
pub mod document;
pub mod error;
pub mod extractor;
pub mod text;

pub use batch::{discover_pdfs, BatchError, BatchReport};
pub use credentials::{Credential, Credentials, PASSWORD_VARS};
pub use document::{Document, PdfDocument};
pub use error::{DocumentError, ExtractError};
pub use extractor::{page_block, Extraction, Extractor, LockedPolicy, Rendered};
pub use text::page_text;
