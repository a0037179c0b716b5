use super::{
    failure::FailureKind,
    transport::InferenceTransport,
};
use crate::models::{AvailabilityEntry, GenerationParameters, InferenceRequest, ModelCandidate};
use std::sync::Arc;

const PROBE_PROMPT: &str = "test";

#[derive(Clone)]
pub struct AvailabilityProber {
    transport: Arc<dyn InferenceTransport>,
    candidates: Arc<[ModelCandidate]>,
}

impl AvailabilityProber {
    pub fn new(transport: Arc<dyn InferenceTransport>, candidates: Vec<ModelCandidate>) -> Self {
        Self {
            transport,
            candidates: candidates.into(),
        }
    }

    /// Reports one entry per candidate, in order. Never fails: each probe's
    /// error is captured in its own entry and the remaining candidates are still probed.
    pub async fn probe(&self, credential: &str) -> Vec<AvailabilityEntry> {
        let request = InferenceRequest::new(PROBE_PROMPT, GenerationParameters::probe());
        let mut results = Vec::with_capacity(self.candidates.len());

        for candidate in self.candidates.iter() {
            log::debug!("Probing model: {}", candidate.id);

            let entry = match self
                .transport
                .post_json(&candidate.endpoint, credential, &request)
                .await
            {
                Ok(response) if response.is_success() => AvailabilityEntry::available(&candidate.id),
                Ok(response) => {
                    let detail = format!("{}: {}", response.status, response.status_text);
                    match FailureKind::from_status(response.status) {
                        FailureKind::Loading => AvailabilityEntry::loading(&candidate.id, detail),
                        _ => AvailabilityEntry::unavailable(&candidate.id, detail),
                    }
                }
                Err(e) => AvailabilityEntry::unavailable(&candidate.id, e.to_string()),
            };

            log::info!("Model {} is {}", candidate.id, entry.state());
            results.push(entry);
        }

        results
    }
}
