use thiserror::Error;

#[derive(Debug, Error)]
pub enum DesignError {
    #[error("Missing required field: {field}")]
    MissingRequiredField { field: &'static str },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("AWS error: {0}")]
    AwsError(String),
    #[error("AWS service error: {0}")]
    AwsServiceError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DesignError {
    /// Whether the caller can fix this by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DesignError::MissingRequiredField { .. })
    }

    /// The message shown to callers. Server-side faults never echo their detail.
    pub fn public_message(&self) -> &'static str {
        if self.is_client_error() {
            "Plot length and width are required"
        } else {
            "AI generation failed"
        }
    }
}

pub type Result<T> = std::result::Result<T, DesignError>;

#[cfg(feature = "server")]
impl actix_web::ResponseError for DesignError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        if self.is_client_error() {
            actix_web::http::StatusCode::BAD_REQUEST
        } else {
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.public_message() }))
    }
}
