use serde::{Deserialize, Serialize};

/// Text-to-image models tried in order of preference.
pub const DEFAULT_MODELS: [&str; 4] = [
    "stabilityai/stable-diffusion-xl-base-1.0",
    "runwayml/stable-diffusion-v1-5",
    "stabilityai/stable-diffusion-2-1",
    "CompVis/stable-diffusion-v1-4",
];

pub fn default_model_ids() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|id| id.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCandidate {
    pub id: String,
    pub endpoint: String,
}

impl ModelCandidate {
    pub fn new(base_url: &str, id: impl Into<String>) -> Self {
        let id = id.into();
        let endpoint = format!("{}/models/{}", base_url.trim_end_matches('/'), id);
        Self { id, endpoint }
    }
}
