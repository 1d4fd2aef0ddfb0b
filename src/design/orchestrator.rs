use super::RequestState;
use crate::{
    config::{GenerationConfig, GenerationMode},
    generators::ImageGenerator,
    models::{
        DesignPrompts, GenerationResult, ImageGenerationRequest, ImagePayload, ImageSize, Slot,
        SlotOutcome,
    },
};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use uuid::Uuid;

/// Drives one generation call per prompt and folds the outcomes into a
/// `GenerationResult`. A failed call only empties its own slot.
#[derive(Clone)]
pub struct ImageRequestOrchestrator {
    generator: Arc<dyn ImageGenerator>,
    size: ImageSize,
    mode: GenerationMode,
}

impl ImageRequestOrchestrator {
    pub fn new(generator: Arc<dyn ImageGenerator>, config: &GenerationConfig) -> Self {
        Self {
            generator,
            size: config.size,
            mode: config.mode,
        }
    }

    pub fn generator(&self) -> &Arc<dyn ImageGenerator> {
        &self.generator
    }

    /// Runs the three calls and returns the aggregate. Nothing a provider
    /// does, panics included, fails the aggregate.
    pub async fn generate(&self, request_id: Uuid, prompts: &DesignPrompts) -> GenerationResult {
        match self.mode {
            GenerationMode::Sequential => self.generate_sequential(request_id, prompts).await,
            GenerationMode::Concurrent => self.generate_concurrent(request_id, prompts).await,
        }
    }

    async fn generate_sequential(&self, request_id: Uuid, prompts: &DesignPrompts) -> GenerationResult {
        let mut result = GenerationResult::default();
        for prompt in prompts.iter() {
            let outcome = generate_slot(
                self.generator.as_ref(),
                request_id,
                prompt.slot,
                &prompt.text,
                self.size,
            )
            .await;
            result.set(prompt.slot, outcome.into_image());
        }
        result
    }

    async fn generate_concurrent(&self, request_id: Uuid, prompts: &DesignPrompts) -> GenerationResult {
        let handles = prompts.iter().map(|prompt| {
            let generator = Arc::clone(&self.generator);
            let slot = prompt.slot;
            let text = prompt.text.clone();
            let size = self.size;
            tokio::spawn(async move {
                generate_slot(generator.as_ref(), request_id, slot, &text, size).await
            })
        });

        let joined = futures::future::join_all(handles).await;

        let mut result = GenerationResult::default();
        for (slot, outcome) in Slot::ALL.into_iter().zip(joined) {
            let image = match outcome {
                Ok(outcome) => outcome.into_image(),
                Err(e) => {
                    log::error!("[req:{}] ❌ {} task aborted: {}", request_id, slot, e);
                    None
                }
            };
            result.set(slot, image);
        }
        result
    }
}

/// One external call behind the failure boundary: every error, including an
/// undecodable payload or a panicking backend, comes back as
/// `SlotOutcome::Failure`.
pub async fn generate_slot(
    generator: &dyn ImageGenerator,
    request_id: Uuid,
    slot: Slot,
    prompt: &str,
    size: ImageSize,
) -> SlotOutcome {
    log::debug!("[req:{}] -> {}", request_id, RequestState::Generating(slot));
    log::info!("[req:{}] 🧠 Generating {}...", request_id, slot);

    let request = ImageGenerationRequest {
        prompt: prompt.to_string(),
        size,
    };

    let outcome = match AssertUnwindSafe(generator.generate(request)).catch_unwind().await {
        Ok(Ok(response)) => {
            match ImagePayload::from_base64(response.mime_type, &response.image_data) {
                Ok(image) => {
                    log::info!(
                        "[req:{}] ✅ {} ready from {} ({} bytes)",
                        request_id,
                        slot,
                        response.model,
                        image.bytes.len()
                    );
                    SlotOutcome::Success(image)
                }
                Err(reason) => SlotOutcome::Failure(reason),
            }
        }
        Ok(Err(e)) => SlotOutcome::Failure(e.to_string()),
        Err(panic) => {
            SlotOutcome::Failure(format!("generator panicked: {}", panic_message(&*panic)))
        }
    };

    if let SlotOutcome::Failure(reason) = &outcome {
        log::error!("[req:{}] ❌ {} FAILED: {}", request_id, slot, reason);
    }
    outcome
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}
