use super::traits::ImageGenerator;
use crate::{
    config::BedrockConfig,
    error::{DesignError, Result},
    models::{ImageGenerationRequest, ImageGenerationResponse, ModelInfo, TitanImageResponse},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{
    config::{Credentials, Region},
    error::ProvideErrorMetadata,
    primitives::Blob,
    Client,
};
use serde_json::{json, Value};

const TITAN_IMAGE_PREFIX: &str = "amazon.titan-image-generator";

const MODELS: &[ModelInfo] = &[
    ModelInfo::new(
        "amazon.titan-image-generator-v1",
        "Titan Image Generator G1",
        "Amazon",
    ),
    ModelInfo::new(
        "amazon.titan-image-generator-v2:0",
        "Titan Image Generator G1 v2",
        "Amazon",
    ),
];

#[derive(Clone)]
pub struct BedrockImageClient {
    client: Client,
    model_id: String,
}

impl BedrockImageClient {
    pub async fn new(config: &BedrockConfig) -> Result<Self> {
        if !config.model_id.starts_with(TITAN_IMAGE_PREFIX) {
            return Err(DesignError::ConfigError(format!(
                "Unsupported image model: {}",
                config.model_id
            )));
        }

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            loader = loader.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "homegenius",
            ));
        } else {
            log::warn!("No AWS credentials configured, using the default credential chain");
        }

        let aws_config = loader.load().await;
        Ok(Self::with_client(Client::new(&aws_config), &config.model_id))
    }

    pub fn with_client(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    pub fn supported_models() -> &'static [ModelInfo] {
        MODELS
    }
}

fn build_payload(request: &ImageGenerationRequest) -> Value {
    json!({
        "taskType": "TEXT_IMAGE",
        "textToImageParams": {
            "text": request.prompt,
        },
        "imageGenerationConfig": {
            "numberOfImages": 1,
            "width": request.size.width,
            "height": request.size.height,
            "quality": "standard",
            "cfgScale": 8.0
        }
    })
}

fn parse_response(bytes: &[u8]) -> Result<String> {
    let titan_response: TitanImageResponse =
        serde_json::from_slice(bytes).map_err(|e| DesignError::ResponseError(e.to_string()))?;

    if let Some(error) = titan_response.error.filter(|e| !e.is_empty()) {
        return Err(DesignError::ProviderError(error));
    }

    titan_response
        .images
        .into_iter()
        .next()
        .ok_or_else(|| DesignError::ResponseError("No images generated".into()))
}

#[async_trait]
impl ImageGenerator for BedrockImageClient {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse> {
        let request_json = serde_json::to_string(&build_payload(&request))
            .map_err(|e| DesignError::SerializationError(e.to_string()))?;

        log::info!("Generating image with model: {}", self.model_id);

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| {
                if let Some(service_error) = e.as_service_error() {
                    DesignError::AwsServiceError(format!(
                        "{} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    DesignError::AwsError(e.to_string())
                }
            })?;

        let image_data = parse_response(&response.body.into_inner())?;

        Ok(ImageGenerationResponse {
            image_data,
            mime_type: "image/png".to_string(),
            model: self.model_id.clone(),
        })
    }

    fn provider(&self) -> &'static str {
        "bedrock"
    }

    fn model(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageSize;

    #[test]
    fn test_titan_payload_uses_requested_size() {
        let request = ImageGenerationRequest {
            prompt: "A villa".to_string(),
            size: ImageSize {
                width: 768,
                height: 512,
            },
        };
        let payload = build_payload(&request);

        assert_eq!(payload["taskType"], "TEXT_IMAGE");
        assert_eq!(payload["textToImageParams"]["text"], "A villa");
        assert_eq!(payload["imageGenerationConfig"]["width"], 768);
        assert_eq!(payload["imageGenerationConfig"]["height"], 512);
        assert_eq!(payload["imageGenerationConfig"]["numberOfImages"], 1);
    }

    #[test]
    fn test_parse_titan_response() {
        assert_eq!(
            parse_response(br#"{"images":["aGk="],"error":null}"#).unwrap(),
            "aGk="
        );
        assert!(matches!(
            parse_response(br#"{"images":[]}"#),
            Err(DesignError::ResponseError(_))
        ));
        assert!(matches!(
            parse_response(br#"{"images":[],"error":"content filtered"}"#),
            Err(DesignError::ProviderError(_))
        ));
        assert!(matches!(
            parse_response(b"not json"),
            Err(DesignError::ResponseError(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_non_titan_model() {
        let config = BedrockConfig {
            model_id: "stability.stable-diffusion-xl-v1".to_string(),
            ..BedrockConfig::new()
        };
        assert!(matches!(
            BedrockImageClient::new(&config).await,
            Err(DesignError::ConfigError(_))
        ));
    }
}
