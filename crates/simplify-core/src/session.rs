//! Contract session: the canonical state of one simplification
//!
//! A session owns the extracted source text and, once ingestion succeeds,
//! the current [`Document`]. Every committed change bumps `revision`;
//! rendered artifacts are stored with the revision they were rendered from
//! and are only handed out while that revision is still current.

use contract_extract::extract_raw_text;
use contract_types::{Artifacts, Document, Section};

use crate::error::SimplifyError;

#[derive(Debug, Clone)]
struct TaggedArtifacts {
    revision: u64,
    artifacts: Artifacts,
}

#[derive(Debug, Clone)]
pub struct ContractSession {
    source_label: String,
    source_text: String,
    document: Option<Document>,
    revision: u64,
    artifacts: Option<TaggedArtifacts>,
}

impl ContractSession {
    /// Start a session from already-extracted text
    pub fn new(source_label: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            source_text: source_text.into(),
            document: None,
            revision: 0,
            artifacts: None,
        }
    }

    /// Extract the text of an uploaded `.pdf`/`.docx` and start a session on it
    pub fn from_upload(file_name: &str, bytes: &[u8]) -> Result<Self, SimplifyError> {
        let text = extract_raw_text(file_name, bytes)?;
        Ok(Self::new(file_name, text))
    }

    /// Resume from a previously saved document (no ingestion needed)
    pub fn with_document(
        source_label: impl Into<String>,
        source_text: impl Into<String>,
        document: Document,
    ) -> Self {
        let mut session = Self::new(source_label, source_text);
        session.install(document);
        session
    }

    /// Name of the uploaded contract file
    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    /// File name for a downloaded artifact, e.g. `simplificado_contrato.docx.pdf`
    pub fn download_name(&self, extension: &str) -> String {
        format!("simplificado_{}.{}", self.source_label, extension)
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn is_simplified(&self) -> bool {
        self.document.is_some()
    }

    /// Sections in presentation order; empty before ingestion
    pub fn sections(&self) -> &[Section] {
        self.document.as_ref().map(Document::sections).unwrap_or(&[])
    }

    /// Incremented on every committed document change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Artifacts rendered from the current revision, if any
    pub fn artifacts(&self) -> Option<&Artifacts> {
        self.artifacts
            .as_ref()
            .filter(|tagged| tagged.revision == self.revision && self.document.is_some())
            .map(|tagged| &tagged.artifacts)
    }

    pub fn has_fresh_artifacts(&self) -> bool {
        self.artifacts().is_some()
    }

    /// Set the first document
    pub(crate) fn install(&mut self, document: Document) -> u64 {
        self.commit(document)
    }

    /// Swap in a new document atomically
    pub(crate) fn replace(&mut self, document: Document) -> u64 {
        self.commit(document)
    }

    /// Store artifacts for `revision`; ignored if the session has moved on
    pub(crate) fn store_artifacts(&mut self, revision: u64, artifacts: Artifacts) -> bool {
        if revision != self.revision {
            tracing::debug!(
                "Discarding artifacts for revision {} (current {})",
                revision,
                self.revision
            );
            return false;
        }
        self.artifacts = Some(TaggedArtifacts {
            revision,
            artifacts,
        });
        true
    }

    fn commit(&mut self, document: Document) -> u64 {
        self.document = Some(document);
        self.revision += 1;
        self.artifacts = None;
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifacts(tag: &str) -> Artifacts {
        Artifacts {
            html: tag.to_string(),
            pdf: tag.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = ContractSession::new("c.pdf", "texto");
        assert!(!session.is_simplified());
        assert!(session.sections().is_empty());
        assert_eq!(session.revision(), 0);
        assert!(session.artifacts().is_none());
    }

    #[test]
    fn test_commit_invalidates_artifacts() {
        let mut session = ContractSession::new("c.pdf", "texto");
        let rev = session.install(Document::default());
        assert!(session.store_artifacts(rev, artifacts("v1")));
        assert_eq!(session.artifacts().map(|a| a.html.as_str()), Some("v1"));

        let rev2 = session.replace(Document::new(vec![Section::new("a", "b", "c")]));
        assert_eq!(rev2, rev + 1);
        assert!(session.artifacts().is_none());
    }

    #[test]
    fn test_stale_artifacts_are_rejected() {
        let mut session = ContractSession::new("c.pdf", "texto");
        let old = session.install(Document::default());
        session.replace(Document::default());

        assert!(!session.store_artifacts(old, artifacts("old")));
        assert!(!session.has_fresh_artifacts());
    }

    #[test]
    fn test_upload_with_unsupported_format() {
        let err = ContractSession::from_upload("contrato.txt", b"hola").unwrap_err();
        assert!(matches!(err, SimplifyError::Extraction(_)));
    }

    #[test]
    fn test_resume_from_saved_document() {
        let doc = Document::new(vec![Section::new("a", "b", "c")]);
        let session = ContractSession::with_document("c.pdf", "", doc.clone());
        assert_eq!(session.document(), Some(&doc));
        assert_eq!(session.revision(), 1);
        assert_eq!(session.download_name("json"), "simplificado_c.pdf.json");
    }
}
