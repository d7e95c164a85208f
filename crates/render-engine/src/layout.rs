//! Layout snapshot shared by the HTML and PDF renderers
//!
//! Both presentation formats are derived from one `ContractLayout` so they
//! always agree on numbering, paragraph splitting and the header timestamp.

use chrono::{DateTime, TimeZone};
use contract_types::Document;
use serde::Serialize;

/// Product heading shown at the top of every rendering
pub const PRODUCT_TITLE: &str = "LumenLex Contrato Simplificado";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Presentation-ready view of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractLayout {
    pub title: String,
    pub source: String,
    pub generated_at: String,
    pub sections: Vec<SectionLayout>,
}

/// One numbered section with its body already split into paragraphs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionLayout {
    /// 1-based position in the document
    pub number: usize,
    pub title: String,
    pub paragraphs: Vec<String>,
    pub rationale: String,
}

impl ContractLayout {
    pub fn snapshot<Tz>(document: &Document, source_label: &str, generated_at: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let sections = document
            .sections()
            .iter()
            .enumerate()
            .map(|(i, section)| SectionLayout {
                number: i + 1,
                title: section.title.clone(),
                paragraphs: section.paragraphs().map(str::to_string).collect(),
                rationale: section.rationale.clone(),
            })
            .collect();

        Self {
            title: PRODUCT_TITLE.to_string(),
            source: source_label.to_string(),
            generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
            sections,
        }
    }

    /// Page title used by both the HTML `<title>` and the PDF metadata
    pub fn document_title(&self) -> String {
        format!("Contrato Simplificado - {}", self.source)
    }
}
