//! In-memory transport that replays scripted replies, for tests and offline demos.

use super::transport::{InferenceTransport, TransportResponse};
use crate::{
    error::{HfError, Result},
    models::InferenceRequest,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Respond(TransportResponse),
    NetworkError(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub url: String,
    pub credential: String,
    pub body: InferenceRequest,
}

/// Replies are keyed by model id and matched against the `/models/<id>` suffix of the URL.
/// A model with no reply left fails with a network error.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<Vec<(String, VecDeque<ScriptedReply>)>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, model: &str, reply: ScriptedReply) -> Self {
        {
            let mut replies = self.replies.lock().unwrap_or_else(|e| e.into_inner());
            match replies.iter_mut().find(|(id, _)| id == model) {
                Some((_, queue)) => queue.push_back(reply),
                None => replies.push((model.to_string(), VecDeque::from([reply]))),
            }
        }
        self
    }

    pub fn respond(self, model: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.reply(
            model,
            ScriptedReply::Respond(TransportResponse::new(status, body)),
        )
    }

    pub fn respond_image(self, model: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.reply(
            model,
            ScriptedReply::Respond(TransportResponse::new(200, bytes).with_content_type("image/png")),
        )
    }

    pub fn fail(self, model: &str, error: impl Into<String>) -> Self {
        self.reply(model, ScriptedReply::NetworkError(error.into()))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Model ids in the order they were called.
    pub fn called_models(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|call| call.url.split_once("/models/").map(|(_, id)| id.to_string()))
            .collect()
    }

    fn next_reply(&self, url: &str) -> Option<ScriptedReply> {
        let mut replies = self.replies.lock().unwrap_or_else(|e| e.into_inner());
        replies
            .iter_mut()
            .find(|(id, _)| url.ends_with(&format!("/models/{}", id)))
            .and_then(|(_, queue)| queue.pop_front())
    }
}

#[async_trait]
impl InferenceTransport for ScriptedTransport {
    async fn post_json(
        &self,
        url: &str,
        credential: &str,
        body: &InferenceRequest,
    ) -> Result<TransportResponse> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                url: url.to_string(),
                credential: credential.to_string(),
                body: body.clone(),
            });

        match self.next_reply(url) {
            Some(ScriptedReply::Respond(response)) => Ok(response),
            Some(ScriptedReply::NetworkError(error)) => Err(HfError::RequestError(error)),
            None => Err(HfError::RequestError(format!(
                "no scripted reply for {}",
                url
            ))),
        }
    }
}
