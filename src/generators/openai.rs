use super::traits::ImageGenerator;
use crate::{
    config::OpenAiConfig,
    error::{DesignError, Result},
    models::{
        ImageGenerationRequest, ImageGenerationResponse, ModelInfo, OpenAiErrorResponse,
        OpenAiImageRequest, OpenAiImageResponse,
    },
};
use async_trait::async_trait;
use std::time::Duration;

const MODELS: &[ModelInfo] = &[
    ModelInfo::new("gpt-image-1", "GPT Image 1", "OpenAI"),
    ModelInfo::new("dall-e-3", "DALL-E 3", "OpenAI"),
    ModelInfo::new("dall-e-2", "DALL-E 2", "OpenAI"),
];

#[derive(Clone)]
pub struct OpenAiImageClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| DesignError::ConfigError("OPENAI_API_KEY missing".into()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DesignError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn supported_models() -> &'static [ModelInfo] {
        MODELS
    }

    fn endpoint(&self) -> String {
        format!("{}/images/generations", self.base_url)
    }

    fn build_payload<'a>(&'a self, request: &'a ImageGenerationRequest) -> OpenAiImageRequest<'a> {
        // gpt-image models always answer with b64_json and reject the field.
        let response_format = if self.model.starts_with("dall-e") {
            Some("b64_json")
        } else {
            None
        };

        OpenAiImageRequest {
            model: &self.model,
            prompt: &request.prompt,
            size: request.size.to_string(),
            response_format,
        }
    }
}

/// Extracts the first base64 image from an images API reply.
fn parse_response(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        let detail = match serde_json::from_str::<OpenAiErrorResponse>(body) {
            Ok(err) => match err.error.kind {
                Some(kind) => format!("{} ({})", err.error.message, kind),
                None => err.error.message,
            },
            Err(_) => body.chars().take(200).collect(),
        };
        return Err(DesignError::ProviderError(format!(
            "HTTP {}: {}",
            status, detail
        )));
    }

    let parsed: OpenAiImageResponse =
        serde_json::from_str(body).map_err(|e| DesignError::ResponseError(e.to_string()))?;

    let first = parsed
        .data
        .into_iter()
        .next()
        .ok_or_else(|| DesignError::ResponseError("No images generated".into()))?;

    if let Some(revised) = &first.revised_prompt {
        log::debug!("Provider revised prompt: {}", revised);
    }

    first
        .b64_json
        .filter(|data| !data.is_empty())
        .ok_or_else(|| DesignError::ResponseError("Image data missing from response".into()))
}

#[async_trait]
impl ImageGenerator for OpenAiImageClient {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse> {
        let payload = self.build_payload(&request);
        log::info!("Generating image with model: {}", self.model);

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DesignError::RequestError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DesignError::ResponseError(e.to_string()))?;

        let image_data = parse_response(status, &body)?;

        Ok(ImageGenerationResponse {
            image_data,
            mime_type: "image/png".to_string(),
            model: self.model.clone(),
        })
    }

    fn provider(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageSize;

    fn client(model: &str) -> OpenAiImageClient {
        let config = OpenAiConfig::new()
            .with_api_key("sk-test")
            .with_base_url("https://images.example.com/v1/")
            .with_model(model);
        OpenAiImageClient::new(&config).unwrap()
    }

    fn request() -> ImageGenerationRequest {
        ImageGenerationRequest {
            prompt: "A house".to_string(),
            size: ImageSize::default(),
        }
    }

    #[test]
    fn test_payload_for_gpt_image() {
        let client = client("gpt-image-1");
        let request = request();
        let payload = serde_json::to_value(client.build_payload(&request)).unwrap();

        assert_eq!(
            payload,
            serde_json::json!({
                "model": "gpt-image-1",
                "prompt": "A house",
                "size": "1024x1024"
            })
        );
        assert_eq!(client.endpoint(), "https://images.example.com/v1/images/generations");
    }

    #[test]
    fn test_payload_for_dalle_requests_base64() {
        let client = client("dall-e-3");
        let request = request();
        let payload = serde_json::to_value(client.build_payload(&request)).unwrap();
        assert_eq!(payload["response_format"], "b64_json");
    }

    #[test]
    fn test_parse_success() {
        let body = r#"{"created":1,"data":[{"b64_json":"aGVsbG8="}]}"#;
        assert_eq!(parse_response(200, body).unwrap(), "aGVsbG8=");
    }

    #[test]
    fn test_parse_provider_error() {
        let body = r#"{"error":{"message":"Billing hard limit reached","type":"billing"}}"#;
        match parse_response(400, body) {
            Err(DesignError::ProviderError(msg)) => {
                assert!(msg.contains("HTTP 400"));
                assert!(msg.contains("Billing hard limit reached"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_and_malformed() {
        assert!(matches!(
            parse_response(200, r#"{"data":[]}"#),
            Err(DesignError::ResponseError(_))
        ));
        assert!(matches!(
            parse_response(200, r#"{"data":[{"url":"https://x"}]}"#),
            Err(DesignError::ResponseError(_))
        ));
        assert!(matches!(
            parse_response(200, "<html>"),
            Err(DesignError::ResponseError(_))
        ));
        assert!(matches!(
            parse_response(502, "Bad Gateway"),
            Err(DesignError::ProviderError(_))
        ));
    }
}
