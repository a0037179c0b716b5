use crate::error::{HfError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_INFERENCE_STEPS: u32 = 50;
pub const DEFAULT_GUIDANCE_SCALE: f32 = 7.5;
pub const DEFAULT_WIDTH: u32 = 512;
pub const DEFAULT_HEIGHT: u32 = 512;

/// Caller-side prompt check; returns the trimmed prompt.
pub fn validate_prompt(prompt: &str) -> Result<&str> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(HfError::InvalidPrompt(
            "Please enter a prompt to generate an image".into(),
        ));
    }
    Ok(trimmed)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub negative_prompt: Option<String>,
    pub num_inference_steps: Option<u32>,
    pub guidance_scale: Option<f32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.num_inference_steps = Some(steps);
        self
    }

    pub fn with_guidance_scale(mut self, scale: f32) -> Self {
        self.guidance_scale = Some(scale);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_inference_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance_scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl GenerationParameters {
    /// Options laid over the documented defaults. Values are passed through unchecked.
    pub fn merged(options: Option<&GenerationOptions>) -> Self {
        let options = options.cloned().unwrap_or_default();
        Self {
            negative_prompt: options.negative_prompt,
            num_inference_steps: Some(
                options
                    .num_inference_steps
                    .unwrap_or(DEFAULT_INFERENCE_STEPS),
            ),
            guidance_scale: Some(options.guidance_scale.unwrap_or(DEFAULT_GUIDANCE_SCALE)),
            width: Some(options.width.unwrap_or(DEFAULT_WIDTH)),
            height: Some(options.height.unwrap_or(DEFAULT_HEIGHT)),
        }
    }

    /// Smallest useful parameter set, used when probing.
    pub fn probe() -> Self {
        Self {
            width: Some(DEFAULT_WIDTH),
            height: Some(DEFAULT_HEIGHT),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub inputs: String,
    pub parameters: GenerationParameters,
}

impl InferenceRequest {
    pub fn new(prompt: impl Into<String>, parameters: GenerationParameters) -> Self {
        Self {
            inputs: prompt.into(),
            parameters,
        }
    }
}

/// Error body the inference API may send with a failure status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<serde_json::Value>,
    pub message: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Reads the known fields from any JSON value; non-objects yield an empty body.
    pub fn from_json(value: &serde_json::Value) -> Self {
        Self {
            error: value.get("error").cloned(),
            message: value.get("message").cloned(),
        }
    }

    pub fn best_message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.message
                    .as_ref()
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
            })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedImage {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub model: String,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedImage {
    pub fn new(
        bytes: Vec<u8>,
        content_type: Option<String>,
        model: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            bytes,
            content_type,
            model: model.into(),
            prompt: prompt.into(),
            created_at: Utc::now(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn mime_type(&self) -> &str {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or("image/png")
    }

    pub fn file_extension(&self) -> &'static str {
        match self.mime_type() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }

    pub fn default_file_name(&self) -> String {
        format!(
            "ai-generated-{}.{}",
            self.created_at.timestamp_millis(),
            self.file_extension()
        )
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}
