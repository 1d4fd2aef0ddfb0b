use crate::{
    error::Result,
    models::{ImageGenerationRequest, ImageGenerationResponse},
};
use async_trait::async_trait;

/// The external capability: a text prompt in, one base64 image out, or an error.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse>;

    fn provider(&self) -> &'static str;

    fn model(&self) -> &str;
}
