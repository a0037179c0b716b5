use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub model: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityState {
    Available,
    Loading,
    Unavailable,
}

impl AvailabilityEntry {
    pub fn available(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            available: true,
            error: None,
        }
    }

    /// Reachable but still warming up.
    pub fn loading(model: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            available: true,
            error: Some(detail.into()),
        }
    }

    pub fn unavailable(model: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            available: false,
            error: Some(detail.into()),
        }
    }

    pub fn state(&self) -> AvailabilityState {
        match (self.available, &self.error) {
            (true, None) => AvailabilityState::Available,
            (true, Some(_)) => AvailabilityState::Loading,
            (false, _) => AvailabilityState::Unavailable,
        }
    }
}

impl fmt::Display for AvailabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityState::Available => write!(f, "Available"),
            AvailabilityState::Loading => write!(f, "Loading"),
            AvailabilityState::Unavailable => write!(f, "Unavailable"),
        }
    }
}
