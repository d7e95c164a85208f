//! Rewrite client seam

use async_trait::async_trait;

use crate::error::ServiceError;

/// Sends one prompt to a generative-text service and returns the raw
/// completion text.
///
/// Implementations make exactly one attempt per call; callers decide what
/// to do with failures.
#[async_trait]
pub trait RewriteClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError>;

    /// Name of the backing model, for logs
    fn model(&self) -> &str {
        "unknown"
    }
}
