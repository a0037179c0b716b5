pub mod failure;
pub mod image_client;
pub mod mock;
pub mod prober;
pub mod transport;

use crate::{
    config::HfConfig,
    error::{HfError, Result},
    models::{AvailabilityEntry, GeneratedImage, GenerationOptions},
};
use std::sync::Arc;

pub use failure::{describe_failure, CandidateFailure, FailureKind};
pub use image_client::ImageClient;
pub use prober::AvailabilityProber;
pub use transport::{HttpTransport, InferenceTransport, TransportResponse};

#[derive(Clone)]
pub struct HfClient {
    image_client: ImageClient,
    prober: AvailabilityProber,
    api_key: Option<String>,
}

impl HfClient {
    pub fn new(config: HfConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(config: HfConfig, transport: Arc<dyn InferenceTransport>) -> Result<Self> {
        let candidates = config.candidates();
        if candidates.is_empty() {
            return Err(HfError::ConfigError(
                "At least one model must be configured".into(),
            ));
        }

        Ok(Self {
            image_client: ImageClient::new(transport.clone(), candidates.clone()),
            prober: AvailabilityProber::new(transport, candidates),
            api_key: config.api_key,
        })
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn prober(&self) -> &AvailabilityProber {
        &self.prober
    }

    /// Generate with the API key from configuration.
    pub async fn generate(
        &self,
        prompt: &str,
        options: Option<GenerationOptions>,
    ) -> Result<GeneratedImage> {
        let credential = self.api_key.as_deref().unwrap_or_default();
        self.image_client.generate(prompt, credential, options).await
    }

    /// Probe with the API key from configuration.
    pub async fn check_availability(&self) -> Vec<AvailabilityEntry> {
        let credential = self.api_key.as_deref().unwrap_or_default();
        self.prober.probe(credential).await
    }
}
