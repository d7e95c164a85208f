//! Contract simplification core
//!
//! Owns the state machine for iterative, instruction-driven rewriting of a
//! contract:
//!
//! - [`ContractSession`]: extracted source text, current document, revision
//!   and rendered artifacts
//! - [`Simplifier`]: initial ingestion plus section and document edits,
//!   each committed only after the service reply decodes cleanly
//! - [`RewriteClient`]: seam to the generative-text service, with a
//!   [`GeminiClient`] implementation
//! - [`decoder`]: turns noisy service output into validated payloads

pub mod client;
pub mod decoder;
pub mod error;
pub mod gemini;
pub mod orchestrator;
pub mod policy;
pub mod prompts;
pub mod session;

pub use client::RewriteClient;
pub use decoder::{decode_document, decode_section};
pub use error::{ServiceError, SimplifyError};
pub use gemini::{GeminiClient, GeminiConfig};
pub use orchestrator::{EditOutcome, Simplifier, SimplifierOptions};
pub use policy::SourceContextPolicy;
pub use session::ContractSession;

// Re-export shared types so binaries need a single import path
pub use contract_types::{Artifacts, ArtifactRenderer, Document, EditRequest, RenderError, Section};
