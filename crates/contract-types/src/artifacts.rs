//! Rendered presentation formats and the renderer seam

use thiserror::Error;

use crate::types::Document;

/// HTML and PDF renderings of one document state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub html: String,
    pub pdf: Vec<u8>,
}

/// Errors raised while deriving artifacts from a document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("PDF compilation failed: {}", .0.join("; "))]
    Compile(Vec<String>),

    #[error("PDF export failed: {0}")]
    Export(String),

    #[error("Rendering failed: {0}")]
    Internal(String),
}

/// Converts a document into its presentation formats.
///
/// `source_label` is the name of the uploaded contract, shown in the
/// rendered header.
pub trait ArtifactRenderer: Send + Sync {
    fn render(&self, document: &Document, source_label: &str) -> Result<Artifacts, RenderError>;
}

impl<R: ArtifactRenderer + ?Sized> ArtifactRenderer for std::sync::Arc<R> {
    fn render(&self, document: &Document, source_label: &str) -> Result<Artifacts, RenderError> {
        (**self).render(document, source_label)
    }
}
