use serde::{Deserialize, Serialize};

/// One clause of the simplified contract.
///
/// Serialized with the wire keys the rewrite service produces
/// (`section_title`, `simplified_text`, `justification`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "section_title")]
    pub title: String,
    #[serde(rename = "simplified_text")]
    pub body: String,
    #[serde(rename = "justification")]
    pub rationale: String,
}

impl Section {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            rationale: rationale.into(),
        }
    }

    /// Body split into paragraphs on internal newlines, blank lines dropped
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.body
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

/// The simplified contract: an ordered sequence of sections.
///
/// Order is presentation order. A document is never edited in place by the
/// orchestrator; edits build a new value and swap it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Build a new document with the section at `index` replaced.
    ///
    /// Returns `None` when `index` is out of range; `self` is never touched.
    pub fn with_section(&self, index: usize, section: Section) -> Option<Document> {
        if index >= self.sections.len() {
            return None;
        }

        let mut sections = self.sections.clone();
        sections[index] = section;
        Some(Document { sections })
    }

    /// Pretty JSON in the download format (`{"sections": [...]}`)
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
