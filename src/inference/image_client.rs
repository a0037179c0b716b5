use super::{failure::describe_failure, transport::InferenceTransport};
use crate::{
    error::{HfError, Result},
    models::{GeneratedImage, GenerationOptions, GenerationParameters, InferenceRequest, ModelCandidate},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct ImageClient {
    transport: Arc<dyn InferenceTransport>,
    candidates: Arc<[ModelCandidate]>,
}

impl ImageClient {
    pub fn new(transport: Arc<dyn InferenceTransport>, candidates: Vec<ModelCandidate>) -> Self {
        Self {
            transport,
            candidates: candidates.into(),
        }
    }

    pub fn candidates(&self) -> &[ModelCandidate] {
        &self.candidates
    }

    /// Generates an image, trying each candidate model in priority order.
    ///
    /// Returns the first successful payload. A rejected credential stops the pass
    /// immediately; any other failure moves on to the next candidate. When every
    /// candidate fails, the error lists each failure in the order attempted.
    pub async fn generate(
        &self,
        prompt: &str,
        credential: &str,
        options: Option<GenerationOptions>,
    ) -> Result<GeneratedImage> {
        if credential.is_empty() {
            return Err(HfError::MissingCredential);
        }

        let request = InferenceRequest::new(
            prompt,
            GenerationParameters::merged(options.as_ref()),
        );
        let mut errors = Vec::new();

        for candidate in self.candidates.iter() {
            log::info!("Trying to generate image with model: {}", candidate.id);

            let response = match self
                .transport
                .post_json(&candidate.endpoint, credential, &request)
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    let message = format!("Request to {} failed: {}", candidate.id, e);
                    log::warn!("Model {} failed: {}", candidate.id, message);
                    errors.push(message);
                    continue;
                }
            };

            if response.is_success() {
                log::info!(
                    "Successfully generated image with model: {} ({} bytes)",
                    candidate.id,
                    response.body.len()
                );
                return Ok(GeneratedImage::new(
                    response.body,
                    response.content_type,
                    candidate.id.as_str(),
                    prompt,
                ));
            }

            let failure = describe_failure(&candidate.id, &response);
            if failure.kind.is_authentication() {
                log::error!("Authentication rejected by {}: {}", candidate.id, failure.message);
                return Err(HfError::Unauthorized(failure.message));
            }

            log::warn!("Model {} failed: {}", candidate.id, failure.message);
            errors.push(failure.message);
        }

        Err(HfError::AllModelsFailed(errors))
    }
}
