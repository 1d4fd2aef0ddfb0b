//! Scripted `ImageGenerator` used by the unit tests.

use crate::{
    error::{DesignError, Result},
    generators::ImageGenerator,
    models::{ImageGenerationRequest, ImageGenerationResponse},
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Base64 of the bytes `png!`.
pub const FAKE_IMAGE_B64: &str = "cG5nIQ==";

/// Markers that appear in exactly one of the three prompts.
pub const FLOOR_2D_MARKER: &str = "TOP-DOWN blueprint.";
pub const FLOOR_3D_MARKER: &str = "Dollhouse cutaway.";
pub const EXTERIOR_MARKER: &str = "Daylight render.";

#[derive(Default)]
pub struct RecordingGenerator {
    prompts: Mutex<Vec<String>>,
    fail_on: Vec<&'static str>,
    garbage_on: Vec<&'static str>,
    panic_on: Vec<&'static str>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call whose prompt contains `marker`.
    pub fn failing_on(mut self, marker: &'static str) -> Self {
        self.fail_on.push(marker);
        self
    }

    /// Answer with an undecodable payload when the prompt contains `marker`.
    pub fn garbage_on(mut self, marker: &'static str) -> Self {
        self.garbage_on.push(marker);
        self
    }

    pub fn panicking_on(mut self, marker: &'static str) -> Self {
        self.panic_on.push(marker);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for RecordingGenerator {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let matches = |markers: &[&str]| markers.iter().any(|m| request.prompt.contains(m));

        if matches(&self.panic_on) {
            panic!("generator blew up");
        }
        if matches(&self.fail_on) {
            return Err(DesignError::ProviderError("HTTP 500: upstream failure".into()));
        }

        let image_data = if matches(&self.garbage_on) {
            "%%% not base64 %%%".to_string()
        } else {
            FAKE_IMAGE_B64.to_string()
        };

        Ok(ImageGenerationResponse {
            image_data,
            mime_type: "image/png".to_string(),
            model: "fake-image-1".to_string(),
        })
    }

    fn provider(&self) -> &'static str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-image-1"
    }
}
