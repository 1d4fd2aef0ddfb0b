pub mod bedrock;
pub mod openai;
pub mod traits;

use crate::{
    config::{Config, ImageProvider},
    error::Result,
    models::ModelInfo,
};
use std::sync::Arc;

pub use bedrock::BedrockImageClient;
pub use openai::OpenAiImageClient;
pub use traits::ImageGenerator;

/// Builds the generator selected by `config.provider`.
///
/// Missing credentials surface here as `DesignError::ConfigError`.
pub async fn from_config(config: &Config) -> Result<Arc<dyn ImageGenerator>> {
    let generator: Arc<dyn ImageGenerator> = match config.provider {
        ImageProvider::OpenAi => Arc::new(OpenAiImageClient::new(&config.openai)?),
        ImageProvider::Bedrock => Arc::new(BedrockImageClient::new(&config.bedrock).await?),
    };

    log::info!(
        "Image generator ready: {} ({})",
        generator.provider(),
        generator.model()
    );
    Ok(generator)
}

pub fn supported_models(provider: ImageProvider) -> &'static [ModelInfo] {
    match provider {
        ImageProvider::OpenAi => OpenAiImageClient::supported_models(),
        ImageProvider::Bedrock => BedrockImageClient::supported_models(),
    }
}
