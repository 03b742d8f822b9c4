//! Image provider trait.

use crate::error::Result;
use crate::image::types::{GeneratedImage, GenerationRequest};
use async_trait::async_trait;

/// Trait for image transformation providers.
///
/// Implementations issue exactly one upstream call per `generate`.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Transforms the request's input image according to its prompt.
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage>;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str;

    /// Checks if the provider is reachable and authenticated.
    async fn health_check(&self) -> Result<()>;
}
