pub mod config;
pub mod design;
pub mod error;
pub mod generators;
pub mod logger;
pub mod models;
#[cfg(feature = "server")]
pub mod server;

pub use config::{BedrockConfig, Config, GenerationConfig, GenerationMode, ImageProvider, OpenAiConfig};
pub use design::{DesignService, ImageRequestOrchestrator, PromptComposer};
pub use error::{DesignError, Result};
pub use generators::{BedrockImageClient, ImageGenerator, OpenAiImageClient};
pub use models::*;
