use crate::models::ImageSize;
use std::env;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-image-1";
pub const DEFAULT_BEDROCK_MODEL: &str = "amazon.titan-image-generator-v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageProvider {
    OpenAi,
    Bedrock,
}

impl ImageProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageProvider::OpenAi => "openai",
            ImageProvider::Bedrock => "bedrock",
        }
    }
}

impl FromStr for ImageProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ImageProvider::OpenAi),
            "bedrock" | "aws" => Ok(ImageProvider::Bedrock),
            other => Err(format!("Unknown image provider: {}", other)),
        }
    }
}

impl fmt::Display for ImageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the three slot requests of one design are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    #[default]
    Sequential,
    Concurrent,
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(GenerationMode::Sequential),
            "concurrent" | "parallel" => Ok(GenerationMode::Concurrent),
            other => Err(format!("Unknown generation mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        OpenAiConfig {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            timeout_secs: 120,
        }
    }
}

impl OpenAiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let default = Self::default();
        OpenAiConfig {
            api_key: env::var("OPENAI_API_KEY").ok().filter(|key| !key.trim().is_empty()),
            base_url: env::var("OPENAI_BASE_URL").unwrap_or(default.base_url),
            model: env::var("OPENAI_IMAGE_MODEL").unwrap_or(default.model),
            timeout_secs: env::var("OPENAI_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.timeout_secs),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub model_id: String,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            model_id: DEFAULT_BEDROCK_MODEL.to_string(),
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let region = env::var("AWS_REGION")
            .or_else(|_| env::var("AWS_DEFAULT_REGION"))
            .ok();

        BedrockConfig {
            region,
            access_key: env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
            model_id: env::var("BEDROCK_IMAGE_MODEL")
                .unwrap_or_else(|_| DEFAULT_BEDROCK_MODEL.to_string()),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerationConfig {
    pub size: ImageSize,
    pub mode: GenerationMode,
}

impl GenerationConfig {
    pub fn from_env() -> Self {
        let size = match env::var("IMAGE_SIZE") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                log::warn!("Ignoring IMAGE_SIZE: {}", e);
                ImageSize::default()
            }),
            Err(_) => ImageSize::default(),
        };
        let mode = match env::var("GENERATION_MODE") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                log::warn!("Ignoring GENERATION_MODE: {}", e);
                GenerationMode::default()
            }),
            Err(_) => GenerationMode::default(),
        };

        GenerationConfig { size, mode }
    }

    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub provider: ImageProvider,
    pub openai: OpenAiConfig,
    pub bedrock: BedrockConfig,
    pub generation: GenerationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            provider: ImageProvider::OpenAi,
            openai: OpenAiConfig::default(),
            bedrock: BedrockConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let default = Self::default();
        let provider = match env::var("IMAGE_PROVIDER") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                log::warn!("{}, falling back to {}", e, default.provider);
                default.provider
            }),
            Err(_) => default.provider,
        };

        Config {
            host: env::var("HOST").unwrap_or(default.host),
            port: env::var("PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(default.port),
            cors_origin: env::var("CORS_ORIGIN").unwrap_or(default.cors_origin),
            provider,
            openai: OpenAiConfig::from_env(),
            bedrock: BedrockConfig::from_env(),
            generation: GenerationConfig::from_env(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_openai(mut self, config: OpenAiConfig) -> Self {
        self.openai = config;
        self.provider = ImageProvider::OpenAi;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self.provider = ImageProvider::Bedrock;
        self
    }

    pub fn with_generation(mut self, config: GenerationConfig) -> Self {
        self.generation = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("openai".parse::<ImageProvider>(), Ok(ImageProvider::OpenAi));
        assert_eq!(" Bedrock ".parse::<ImageProvider>(), Ok(ImageProvider::Bedrock));
        assert!("midjourney".parse::<ImageProvider>().is_err());
    }

    #[test]
    fn test_generation_mode_parsing() {
        assert_eq!("sequential".parse::<GenerationMode>(), Ok(GenerationMode::Sequential));
        assert_eq!("CONCURRENT".parse::<GenerationMode>(), Ok(GenerationMode::Concurrent));
        assert!("batch".parse::<GenerationMode>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.port, 5000);
        assert_eq!(config.provider, ImageProvider::OpenAi);
        assert_eq!(config.openai.model, "gpt-image-1");
        assert!(config.openai.api_key.is_none());
        assert_eq!(config.generation.size.to_string(), "1024x1024");
        assert_eq!(config.generation.mode, GenerationMode::Sequential);
    }

    #[test]
    fn test_builders_switch_provider() {
        let config = Config::new().with_bedrock(BedrockConfig::new().with_region("us-west-2"));
        assert_eq!(config.provider, ImageProvider::Bedrock);
        assert_eq!(config.bedrock.region.as_deref(), Some("us-west-2"));

        let config = config.with_openai(OpenAiConfig::new().with_api_key("sk-test"));
        assert_eq!(config.provider, ImageProvider::OpenAi);
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
    }
}
