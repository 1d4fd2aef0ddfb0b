use serde::Serialize;

/// An image model a backend knows how to call.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: &'static str,
}

impl ModelInfo {
    pub const fn new(id: &'static str, name: &'static str, provider: &'static str) -> Self {
        Self { id, name, provider }
    }
}
