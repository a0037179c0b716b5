use crate::models::{default_model_ids, ModelCandidate};
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

#[derive(Debug, Clone)]
pub struct HfConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub models: Vec<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for HfConfig {
    fn default() -> Self {
        HfConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            models: default_model_ids(),
            timeout_secs: None,
        }
    }
}

impl HfConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("HF_API_KEY").ok().filter(|key| !key.is_empty());
        let base_url = env::var("HF_INFERENCE_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let models = env::var("HF_MODELS")
            .ok()
            .map(|raw| parse_model_list(&raw))
            .filter(|models| !models.is_empty())
            .unwrap_or_else(default_model_ids);
        let timeout_secs = env::var("HF_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok());

        HfConfig {
            api_key,
            base_url,
            models,
            timeout_secs,
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

    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = Some(seconds);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Candidates in priority order, endpoints derived from `base_url`.
    pub fn candidates(&self) -> Vec<ModelCandidate> {
        self.models
            .iter()
            .map(|id| ModelCandidate::new(&self.base_url, id))
            .collect()
    }
}

fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}
