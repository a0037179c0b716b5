//! Turns a non-success inference response into a readable message.
//!
//! Classification works on the status code alone, so deciding whether to keep
//! falling back never depends on how a message happens to be worded.

use super::transport::TransportResponse;
use crate::models::ApiErrorBody;

/// Raw bodies longer than this are cut before being appended to a message.
pub const MAX_BODY_EXCERPT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Unauthorized,
    Loading,
    Other(u16),
}

impl FailureKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => FailureKind::NotFound,
            401 => FailureKind::Unauthorized,
            503 => FailureKind::Loading,
            other => FailureKind::Other(other),
        }
    }

    /// The credential itself was rejected; no other model will accept it either.
    pub fn is_authentication(&self) -> bool {
        matches!(self, FailureKind::Unauthorized)
    }

    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            FailureKind::NotFound => Some(
                "The model may not be available or your API key may not have access to it.",
            ),
            FailureKind::Unauthorized => {
                Some("Please check your API key is valid and has the necessary permissions.")
            }
            FailureKind::Loading => {
                Some("The model is currently loading, please try again in a few moments.")
            }
            FailureKind::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFailure {
    pub model: String,
    pub kind: FailureKind,
    pub message: String,
}

pub fn describe_failure(model: &str, response: &TransportResponse) -> CandidateFailure {
    let kind = FailureKind::from_status(response.status);
    let body = response.body_text();

    let mut message = match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(value) => ApiErrorBody::from_json(&value)
            .best_message()
            .map(str::to_string)
            .unwrap_or_else(|| generic_message(model, response)),
        Err(_) => {
            let mut message = generic_message(model, response);
            let excerpt = excerpt(body.trim(), MAX_BODY_EXCERPT);
            if !excerpt.is_empty() {
                message.push_str(" - ");
                message.push_str(excerpt);
            }
            message
        }
    };

    if let Some(guidance) = kind.guidance() {
        message.push_str(". ");
        message.push_str(guidance);
    }

    CandidateFailure {
        model: model.to_string(),
        kind,
        message,
    }
}

fn generic_message(model: &str, response: &TransportResponse) -> String {
    format!(
        "Failed to generate image with {} ({}: {})",
        model, response.status, response.status_text
    )
}

fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
