//! Contract text extraction
//!
//! Turns an uploaded contract (`.pdf` or `.docx`) into one normalized text
//! blob that can be handed to the rewrite service.
//!
//! # Example
//! ```no_run
//! use contract_extract::{extract_raw_text, ExtractionError};
//!
//! fn load(bytes: &[u8]) -> Result<(), ExtractionError> {
//!     let text = extract_raw_text("contrato.docx", bytes)?;
//!     println!("{} characters extracted", text.chars().count());
//!     Ok(())
//! }
//! ```

pub mod docx;
pub mod normalize;
pub mod pdf;

use thiserror::Error;

pub use normalize::normalize_text;

/// Errors that can occur while extracting contract text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Unsupported format '{0}'. Use .docx or .pdf")]
    UnsupportedFormat(String),

    #[error("No text could be extracted from the document")]
    EmptyContent,

    #[error("Document is encrypted or password-protected")]
    Encrypted,

    #[error("Document is corrupt or unreadable: {0}")]
    Corrupt(String),
}

/// Source formats accepted for ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Docx,
}

impl SourceFormat {
    /// Detect the format from a file name's extension (case-insensitive)
    pub fn from_filename(file_name: &str) -> Result<Self, ExtractionError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(SourceFormat::Pdf),
            "docx" => Ok(SourceFormat::Docx),
            _ => Err(ExtractionError::UnsupportedFormat(file_name.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Pdf => "pdf",
            SourceFormat::Docx => "docx",
        }
    }
}

/// Extract all text from a `.docx` or `.pdf` file.
///
/// The declared file name selects the extractor. The result is normalized
/// (see [`normalize_text`]) and guaranteed to contain non-whitespace text.
pub fn extract_raw_text(file_name: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
    let format = SourceFormat::from_filename(file_name)?;

    let raw = match format {
        SourceFormat::Pdf => pdf::extract_pdf_text(bytes)?,
        SourceFormat::Docx => docx::extract_docx_text(bytes)?,
    };

    let text = normalize_text(&raw);
    if text.trim().is_empty() {
        tracing::warn!("No text extracted from {}", file_name);
        return Err(ExtractionError::EmptyContent);
    }

    tracing::info!(
        "Extracted {} characters from {} ({})",
        text.chars().count(),
        file_name,
        format.extension()
    );

    Ok(text)
}
