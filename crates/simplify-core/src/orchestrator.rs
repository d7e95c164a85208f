//! Ingestion and edit orchestration
//!
//! Every operation follows the same shape: check preconditions, build one
//! prompt, make one rewrite call, decode the reply, and only then commit a
//! new document to the session. Artifacts are re-rendered after each
//! commit. A render failure is reported in the [`EditOutcome`] but does not
//! undo the commit.

use std::sync::Arc;
use std::time::{Duration, Instant};

use contract_types::{ArtifactRenderer, Artifacts, Document, EditRequest, RenderError};
use serde::Serialize;

use crate::client::RewriteClient;
use crate::decoder::{decode_document, decode_section};
use crate::error::{ServiceError, SimplifyError};
use crate::policy::SourceContextPolicy;
use crate::prompts::{document_edit_prompt, ingest_prompt, section_edit_prompt};
use crate::session::ContractSession;

#[derive(Debug, Clone, Copy, Default)]
pub struct SimplifierOptions {
    /// Abandon a rewrite call after this long
    pub call_timeout: Option<Duration>,
    pub source_context: SourceContextPolicy,
}

/// Result of a committed ingestion or edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    /// Session revision after the commit
    pub revision: u64,
    pub sections: usize,
    /// Set when the document was committed but artifacts could not be rendered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_error: Option<String>,
}

impl EditOutcome {
    pub fn artifacts_fresh(&self) -> bool {
        self.render_error.is_none()
    }
}

/// Drives a [`ContractSession`] through ingestion and edits
#[derive(Clone)]
pub struct Simplifier {
    client: Arc<dyn RewriteClient>,
    renderer: Arc<dyn ArtifactRenderer>,
    options: SimplifierOptions,
}

impl Simplifier {
    pub fn new(client: Arc<dyn RewriteClient>, renderer: Arc<dyn ArtifactRenderer>) -> Self {
        Self {
            client,
            renderer,
            options: SimplifierOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SimplifierOptions) -> Self {
        self.options = options;
        self
    }

    /// Produce the first document from the session's extracted text.
    ///
    /// On failure the session stays without a document and ingestion can
    /// simply be attempted again.
    pub async fn ingest(&self, session: &mut ContractSession) -> Result<EditOutcome, SimplifyError> {
        if session.is_simplified() {
            return Err(SimplifyError::AlreadySimplified);
        }

        tracing::info!(
            "Simplifying {} ({} characters) with {}",
            session.source_label(),
            session.source_text().chars().count(),
            self.client.model()
        );

        let reply = self.call(&ingest_prompt(session.source_text())).await?;
        let document = decode_document(&reply)?;

        let revision = session.install(document);
        tracing::info!(
            "Installed simplified document for {} with {} sections",
            session.source_label(),
            session.sections().len()
        );

        Ok(self.finish(session, revision).await)
    }

    /// Apply one edit request
    pub async fn apply(
        &self,
        session: &mut ContractSession,
        request: &EditRequest,
    ) -> Result<EditOutcome, SimplifyError> {
        match request {
            EditRequest::SectionEdit { index, instruction } => {
                self.edit_section(session, *index, instruction).await
            }
            EditRequest::DocumentEdit { instruction } => {
                self.edit_document(session, instruction).await
            }
        }
    }

    /// Rewrite the section at `index`; all other sections are kept as-is
    pub async fn edit_section(
        &self,
        session: &mut ContractSession,
        index: usize,
        instruction: &str,
    ) -> Result<EditOutcome, SimplifyError> {
        let document = session.document().ok_or(SimplifyError::NoDocument)?;
        let section = document
            .section(index)
            .ok_or(SimplifyError::SectionOutOfRange {
                index,
                len: document.len(),
            })?;
        let instruction = require_instruction(instruction)?;

        tracing::info!("Editing section {} of {}", index, session.source_label());

        let reply = self.call(&section_edit_prompt(section, instruction)).await?;
        let refined = decode_section(&reply)?;

        let updated = document
            .with_section(index, refined)
            .ok_or(SimplifyError::SectionOutOfRange {
                index,
                len: document.len(),
            })?;
        let revision = session.replace(updated);

        Ok(self.finish(session, revision).await)
    }

    /// Rewrite the whole document; the reply replaces every section
    pub async fn edit_document(
        &self,
        session: &mut ContractSession,
        instruction: &str,
    ) -> Result<EditOutcome, SimplifyError> {
        let document = session.document().ok_or(SimplifyError::NoDocument)?;
        let instruction = require_instruction(instruction)?;

        let source = self
            .options
            .source_context
            .wants_source(instruction)
            .then(|| session.source_text())
            .filter(|text| !text.trim().is_empty());

        tracing::info!(
            "Editing whole document of {} ({} sections, source context: {})",
            session.source_label(),
            document.len(),
            source.is_some()
        );

        let prompt = document_edit_prompt(document, instruction, source);
        let reply = self.call(&prompt).await?;
        let replacement = decode_document(&reply)?;

        tracing::info!(
            "Document edit replaced {} sections with {}",
            document.len(),
            replacement.len()
        );
        let revision = session.replace(replacement);

        Ok(self.finish(session, revision).await)
    }

    /// Render the current document again, for a retry after a render failure
    pub async fn regenerate_artifacts(
        &self,
        session: &mut ContractSession,
    ) -> Result<u64, SimplifyError> {
        let document = session.document().ok_or(SimplifyError::NoDocument)?.clone();
        let revision = session.revision();

        let artifacts = self.render(document, session.source_label()).await?;
        session.store_artifacts(revision, artifacts);
        Ok(revision)
    }

    async fn call(&self, prompt: &str) -> Result<String, SimplifyError> {
        let started = Instant::now();

        let reply = match self.options.call_timeout {
            Some(limit) => tokio::time::timeout(limit, self.client.complete(prompt))
                .await
                .unwrap_or(Err(ServiceError::Timeout(limit.as_millis() as u64))),
            None => self.client.complete(prompt).await,
        };

        match &reply {
            Ok(text) => tracing::debug!(
                "Rewrite call returned {} characters in {}ms",
                text.chars().count(),
                started.elapsed().as_millis()
            ),
            Err(e) => tracing::warn!("Rewrite call failed: {}", e),
        }

        Ok(reply?)
    }

    /// Render after a commit; failures are reported, not propagated
    async fn finish(&self, session: &mut ContractSession, revision: u64) -> EditOutcome {
        let Some(document) = session.document().cloned() else {
            return EditOutcome {
                revision,
                sections: 0,
                render_error: None,
            };
        };

        let rendered = self.render(document, session.source_label()).await;
        let render_error = match rendered {
            Ok(artifacts) => {
                session.store_artifacts(revision, artifacts);
                None
            }
            Err(e) => {
                tracing::error!("Rendering revision {} failed: {}", revision, e);
                Some(e.to_string())
            }
        };

        EditOutcome {
            revision,
            sections: session.sections().len(),
            render_error,
        }
    }

    async fn render(
        &self,
        document: Document,
        source_label: &str,
    ) -> Result<Artifacts, RenderError> {
        let renderer = Arc::clone(&self.renderer);
        let label = source_label.to_string();

        tokio::task::spawn_blocking(move || renderer.render(&document, &label))
            .await
            .map_err(|e| RenderError::Internal(format!("render task failed: {}", e)))?
    }
}

fn require_instruction(instruction: &str) -> Result<&str, SimplifyError> {
    let trimmed = instruction.trim();
    if trimmed.is_empty() {
        Err(SimplifyError::EmptyInstruction)
    } else {
        Ok(trimmed)
    }
}
