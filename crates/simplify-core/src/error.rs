//! Error types for simplification and editing

use contract_extract::ExtractionError;
use contract_types::RenderError;
use thiserror::Error;

/// Failures of the generative-text service call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Rewrite service is not configured: {0}")]
    Config(String),

    #[error("Rewrite service request failed: {0}")]
    Transport(String),

    #[error("Rewrite service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Rewrite service timed out after {0}ms")]
    Timeout(u64),

    #[error("Rewrite service returned no candidates{}", blocked_suffix(.block_reason))]
    NoCandidates { block_reason: Option<String> },

    #[error("Rewrite service response could not be read: {0}")]
    Malformed(String),
}

fn blocked_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(" (blocked: {})", r))
        .unwrap_or_default()
}

/// Every failure an ingestion or edit can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimplifyError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Could not decode service response: {detail}")]
    Decode { detail: String, raw: String },

    #[error("Service response has the wrong shape: {detail}")]
    Validation { detail: String, raw: String },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("No simplified document exists yet")]
    NoDocument,

    #[error("Contract has already been simplified; start a new session to simplify again")]
    AlreadySimplified,

    #[error("Section index {index} is out of range (document has {len} sections)")]
    SectionOutOfRange { index: usize, len: usize },

    #[error("Instruction is empty")]
    EmptyInstruction,
}

impl SimplifyError {
    /// Cleaned raw service text for decode and validation failures
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            SimplifyError::Decode { raw, .. } | SimplifyError::Validation { raw, .. } => Some(raw),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SimplifyError::Service(ServiceError::Timeout(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_candidates_message() {
        let plain = ServiceError::NoCandidates { block_reason: None };
        assert_eq!(plain.to_string(), "Rewrite service returned no candidates");

        let blocked = ServiceError::NoCandidates {
            block_reason: Some("SAFETY".to_string()),
        };
        assert_eq!(
            blocked.to_string(),
            "Rewrite service returned no candidates (blocked: SAFETY)"
        );
    }

    #[test]
    fn test_raw_response_only_for_payload_errors() {
        let err = SimplifyError::Validation {
            detail: "missing 'sections'".to_string(),
            raw: "{}".to_string(),
        };
        assert_eq!(err.raw_response(), Some("{}"));
        assert_eq!(SimplifyError::NoDocument.raw_response(), None);
        assert!(SimplifyError::from(ServiceError::Timeout(10)).is_timeout());
    }
}
