//! Contract rendering engine
//!
//! Derives the presentation formats of a simplified contract:
//!
//! - **HTML**: standalone page with inline styles
//! - **PDF**: compiled in memory with Typst from the same layout snapshot
//!
//! # Example
//! ```no_run
//! use contract_types::{ArtifactRenderer, Document, Section};
//! use render_engine::TypstRenderer;
//!
//! let document = Document::new(vec![Section::new("Pago", "Se paga cada mes.", "Breve.")]);
//! let artifacts = TypstRenderer::new().render(&document, "contrato.pdf").unwrap();
//! assert!(artifacts.pdf.starts_with(b"%PDF"));
//! ```

pub mod html;
pub mod layout;
pub mod pdf;
pub mod world;

use std::time::Instant;

use chrono::Local;
use contract_types::{ArtifactRenderer, Artifacts, Document, RenderError};

pub use html::render_html;
pub use layout::{ContractLayout, SectionLayout, PRODUCT_TITLE};
pub use pdf::compile_pdf;

/// Renders HTML and a Typst-compiled PDF from one layout snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct TypstRenderer;

impl TypstRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactRenderer for TypstRenderer {
    fn render(&self, document: &Document, source_label: &str) -> Result<Artifacts, RenderError> {
        let started = Instant::now();
        let layout = ContractLayout::snapshot(document, source_label, Local::now());

        let html = render_html(&layout);
        let pdf = compile_pdf(&layout)?;

        tracing::info!(
            "Rendered {} sections for {} in {}ms (html {} bytes, pdf {} bytes)",
            layout.sections.len(),
            source_label,
            started.elapsed().as_millis(),
            html.len(),
            pdf.len()
        );

        Ok(Artifacts { html, pdf })
    }
}

/// Renders HTML only; the PDF slot is left empty.
///
/// Used where Typst compilation is unavailable or unwanted, such as
/// lightweight previews and tests of the HTTP surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlOnlyRenderer;

impl ArtifactRenderer for HtmlOnlyRenderer {
    fn render(&self, document: &Document, source_label: &str) -> Result<Artifacts, RenderError> {
        let layout = ContractLayout::snapshot(document, source_label, Local::now());
        Ok(Artifacts {
            html: render_html(&layout),
            pdf: Vec::new(),
        })
    }
}
