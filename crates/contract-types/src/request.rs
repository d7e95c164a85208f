use serde::{Deserialize, Serialize};

/// A pending user instruction against the current document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditRequest {
    /// Rewrite exactly one section
    SectionEdit { index: usize, instruction: String },
    /// Rewrite or restructure the whole document
    DocumentEdit { instruction: String },
}

impl EditRequest {
    pub fn section(index: usize, instruction: impl Into<String>) -> Self {
        EditRequest::SectionEdit {
            index,
            instruction: instruction.into(),
        }
    }

    pub fn document(instruction: impl Into<String>) -> Self {
        EditRequest::DocumentEdit {
            instruction: instruction.into(),
        }
    }

    pub fn instruction(&self) -> &str {
        match self {
            EditRequest::SectionEdit { instruction, .. } => instruction,
            EditRequest::DocumentEdit { instruction } => instruction,
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            EditRequest::SectionEdit { .. } => "section_edit",
            EditRequest::DocumentEdit { .. } => "document_edit",
        }
    }
}
