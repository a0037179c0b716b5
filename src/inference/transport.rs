use crate::{
    error::{HfError, Result},
    models::InferenceRequest,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: reason_phrase(status).to_string(),
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub fn reason_phrase(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}

/// Issues the single POST the inference API expects for one model.
///
/// `Err` is reserved for network-level failures (DNS, connect, timeout, body read);
/// every status the server answers with comes back as `Ok`.
#[async_trait]
pub trait InferenceTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        credential: &str,
        body: &InferenceRequest,
    ) -> Result<TransportResponse>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!("hfgen/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| HfError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl InferenceTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        credential: &str,
        body: &InferenceRequest,
    ) -> Result<TransportResponse> {
        let response = self
            .client
            .post(url)
            .bearer_auth(credential)
            .json(body)
            .send()
            .await
            .map_err(|e| HfError::RequestError(e.to_string()))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| HfError::ResponseError(format!("Failed to read response body: {}", e)))?
            .to_vec();

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenerationParameters, InferenceRequest};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    struct CapturedRequest {
        head: String,
        body: Vec<u8>,
    }

    /// Accepts one connection, records the request and answers with the given reply.
    async fn serve_once(
        status_line: &'static str,
        content_type: &'static str,
        reply: &'static [u8],
    ) -> (String, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let (head, body_start, body_len) = loop {
                let n = stream.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before request completed");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&buf[..pos]).to_string();
                    let body_len = head
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= pos + 4 + body_len {
                        break (head, pos + 4, body_len);
                    }
                }
            };

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                status_line,
                content_type,
                reply.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.write_all(reply).await.unwrap();
            stream.shutdown().await.unwrap();

            CapturedRequest {
                head,
                body: buf[body_start..body_start + body_len].to_vec(),
            }
        });

        (base_url, handle)
    }

    fn header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
        head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    #[test]
    fn test_success_range() {
        assert!(TransportResponse::new(200, vec![]).is_success());
        assert!(TransportResponse::new(204, vec![]).is_success());
        assert!(!TransportResponse::new(302, vec![]).is_success());
        assert!(!TransportResponse::new(503, vec![]).is_success());
    }

    #[test]
    fn test_reason_phrases() {
        assert_eq!(TransportResponse::new(404, vec![]).status_text, "Not Found");
        assert_eq!(reason_phrase(503), "Service Unavailable");
        assert_eq!(reason_phrase(799), "");
    }

    #[test]
    fn test_http_transport_builds_with_timeout() {
        assert!(HttpTransport::new(Some(Duration::from_secs(5))).is_ok());
    }

    #[tokio::test]
    async fn test_post_sends_bearer_json_and_returns_error_status() {
        let (base_url, server) = serve_once(
            "503 Service Unavailable",
            "application/json",
            br#"{"error":"Model a/b is currently loading"}"#,
        )
        .await;
        let transport = HttpTransport::new(Some(Duration::from_secs(10))).unwrap();
        let request = InferenceRequest::new("p", GenerationParameters::merged(None));

        let response = transport
            .post_json(&format!("{}/models/a/b", base_url), "hf_x", &request)
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert_eq!(response.status_text, "Service Unavailable");
        assert!(!response.is_success());
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
        assert_eq!(response.body_text(), r#"{"error":"Model a/b is currently loading"}"#);

        let captured = server.await.unwrap();
        assert!(captured.head.starts_with("POST /models/a/b HTTP/1.1"));
        assert_eq!(header(&captured.head, "authorization"), Some("Bearer hf_x"));
        assert_eq!(header(&captured.head, "content-type"), Some("application/json"));

        let body: serde_json::Value = serde_json::from_slice(&captured.body).unwrap();
        assert_eq!(
            body,
            json!({
                "inputs": "p",
                "parameters": {
                    "num_inference_steps": 50,
                    "guidance_scale": 7.5,
                    "width": 512,
                    "height": 512
                }
            })
        );
    }

    #[tokio::test]
    async fn test_post_returns_image_bytes_on_success() {
        let (base_url, server) = serve_once("200 OK", "image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0]).await;
        let transport = HttpTransport::new(None).unwrap();
        let request = InferenceRequest::new("test", GenerationParameters::probe());

        let response = transport
            .post_json(&format!("{}/models/m", base_url), "hf_key", &request)
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.status_text, "OK");
        assert_eq!(response.content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(response.body, vec![0xFF, 0xD8, 0xFF, 0xE0]);

        let captured = server.await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&captured.body).unwrap();
        assert_eq!(
            body,
            json!({ "inputs": "test", "parameters": { "width": 512, "height": 512 } })
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(Some(Duration::from_secs(5))).unwrap();
        let request = InferenceRequest::new("p", GenerationParameters::merged(None));
        let result = transport
            .post_json(&format!("http://{}/models/m", addr), "hf_key", &request)
            .await;

        assert!(matches!(result, Err(HfError::RequestError(_))));
    }
}
