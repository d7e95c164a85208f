//! Shared types for the contract simplifier
//!
//! The simplified contract model (sections and documents), the edit
//! requests applied to it, and the rendering seam used to derive HTML and
//! PDF artifacts from a document.

pub mod artifacts;
pub mod request;
pub mod types;

pub use artifacts::{ArtifactRenderer, Artifacts, RenderError};
pub use request::EditRequest;
pub use types::{Document, Section};
