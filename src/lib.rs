//! Text-to-image generation against the Hugging Face Inference API.
//!
//! [`ImageClient::generate`] walks an ordered list of candidate models and returns the
//! first image produced; [`AvailabilityProber::probe`] reports which candidates are
//! currently usable.

pub mod config;
pub mod error;
pub mod inference;
pub mod logger;
pub mod models;

pub use config::HfConfig;
pub use error::{HfError, Result};
pub use inference::{AvailabilityProber, HfClient, HttpTransport, ImageClient, InferenceTransport};
pub use models::*;
