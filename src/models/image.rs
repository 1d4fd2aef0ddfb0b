use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageSize {
    fn default() -> Self {
        ImageSize {
            width: 1024,
            height: 1024,
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("Invalid image size '{}', expected WIDTHxHEIGHT", s))?;
        let width: u32 = width
            .parse()
            .map_err(|_| format!("Invalid image width in '{}'", s))?;
        let height: u32 = height
            .parse()
            .map_err(|_| format!("Invalid image height in '{}'", s))?;
        if width == 0 || height == 0 {
            return Err(format!("Image size '{}' must be non-zero", s));
        }
        Ok(ImageSize { width, height })
    }
}

/// One call to the external generation capability.
#[derive(Debug, Clone)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub size: ImageSize,
}

#[derive(Debug, Clone)]
pub struct ImageGenerationResponse {
    pub image_data: String, // Base64 encoded
    pub mime_type: String,
    pub model: String,
}

/// Decoded image bytes. Serializes as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn from_base64(mime_type: impl Into<String>, encoded: &str) -> Result<Self, String> {
        let trimmed = encoded.trim();
        if trimmed.is_empty() {
            return Err("empty image payload".to_string());
        }
        let bytes = STANDARD
            .decode(trimmed)
            .map_err(|e| format!("invalid base64 image payload: {}", e))?;
        Ok(ImagePayload {
            mime_type: mime_type.into(),
            bytes,
        })
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

impl Serialize for ImagePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_uri())
    }
}

#[derive(Debug, Serialize)]
pub struct OpenAiImageRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiImageResponse {
    #[serde(default)]
    pub data: Vec<OpenAiImageData>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiImageData {
    pub b64_json: Option<String>,
    pub revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiErrorResponse {
    pub error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiErrorBody {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct TitanImageResponse {
    #[serde(default)]
    pub images: Vec<String>,
    pub error: Option<String>,
}
