pub mod orchestrator;
pub mod prompt;
#[cfg(test)]
pub(crate) mod testing;

use crate::{
    config::Config,
    error::{DesignError, Result},
    generators, logger,
    models::{DesignRequest, GenerationResult, Slot},
};
use std::fmt;
use uuid::Uuid;

pub use orchestrator::{generate_slot, ImageRequestOrchestrator};
pub use prompt::PromptComposer;

/// Where a design request is in its lifecycle. Used for tracing only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Validating,
    Rejected,
    ComposingPrompts,
    Generating(Slot),
    Assembled,
    Returned,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestState::Validating => f.write_str("Validating"),
            RequestState::Rejected => f.write_str("Rejected"),
            RequestState::ComposingPrompts => f.write_str("ComposingPrompts"),
            RequestState::Generating(Slot::Floor2D) => f.write_str("Generating2D"),
            RequestState::Generating(Slot::Floor3D) => f.write_str("Generating3D"),
            RequestState::Generating(Slot::Exterior) => f.write_str("GeneratingExterior"),
            RequestState::Assembled => f.write_str("Assembled"),
            RequestState::Returned => f.write_str("Returned"),
        }
    }
}

fn transition(request_id: &Uuid, state: RequestState) {
    log::debug!("[req:{}] -> {}", request_id, state);
}

/// Request-level entry point: validate, compose, generate.
///
/// A service built without a working generator still accepts requests; they
/// pass validation and then fail with `DesignError::ConfigError`.
#[derive(Clone)]
pub struct DesignService {
    composer: PromptComposer,
    backend: std::result::Result<ImageRequestOrchestrator, String>,
}

impl DesignService {
    pub fn new(orchestrator: ImageRequestOrchestrator) -> Self {
        Self {
            composer: PromptComposer::new(),
            backend: Ok(orchestrator),
        }
    }

    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            composer: PromptComposer::new(),
            backend: Err(reason.into()),
        }
    }

    pub async fn from_config(config: &Config) -> Self {
        match generators::from_config(config).await {
            Ok(generator) => Self::new(ImageRequestOrchestrator::new(generator, &config.generation)),
            Err(e) => {
                log::error!("❌ Image generation unavailable: {}", e);
                Self::unconfigured(e.to_string())
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_ok()
    }

    pub fn provider(&self) -> Option<&'static str> {
        self.backend
            .as_ref()
            .ok()
            .map(|orchestrator| orchestrator.generator().provider())
    }

    pub async fn design(&self, request: &DesignRequest) -> Result<GenerationResult> {
        let request_id = Uuid::new_v4();
        let _timer = logger::timer(&format!("design [req:{}]", request_id));

        transition(&request_id, RequestState::Validating);
        let prompts = self.composer.compose(request).map_err(|e| {
            transition(&request_id, RequestState::Rejected);
            log::warn!("[req:{}] Rejected: {}", request_id, e);
            e
        })?;
        transition(&request_id, RequestState::ComposingPrompts);

        let orchestrator = self.backend.as_ref().map_err(|reason| {
            log::error!("[req:{}] Generator not configured: {}", request_id, reason);
            DesignError::ConfigError(reason.clone())
        })?;

        for prompt in prompts.iter() {
            log::trace!("[req:{}] {} prompt:\n{}", request_id, prompt.slot, prompt.text);
        }

        let result = orchestrator.generate(request_id, &prompts).await;
        transition(&request_id, RequestState::Assembled);
        log::info!(
            "[req:{}] Design assembled with {}/3 images",
            request_id,
            result.populated()
        );

        transition(&request_id, RequestState::Returned);
        Ok(result)
    }
}
