//! TextBrief document text extraction
//!
//! Plain text, PDF and Word (.docx) uploads to plain text

mod extractor;
mod pdf;
mod types;
mod word;

pub use extractor::DocumentExtractor;
pub use types::DocumentKind;
