use async_trait::async_trait;
use easel_config::BackendConfig;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

use super::ImageBackend;
use crate::{
    error::{ImageGenError, Result},
    reference::{self, GenerationResult},
    request::GenerationRequest,
};

const GENERATIONS_PATH: &str = "/api/v1/images/generations";

/// Image generation through the host's own images endpoint
///
/// The host owns the workflow, sampler and model selection; only the
/// prompt and the optional size and step count are forwarded.
pub struct OpenWebUiBackend {
    client: Client,
    endpoint: String,
    api_key: Option<SecretString>,
    model: Option<String>,
}

impl OpenWebUiBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ImageGenError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint(config.base_url.as_str()),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

/// Wire format of the generation request
///
/// `steps` is advisory here: the host's images endpoint may render with its
/// own configured step count and ignore the field.
#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<u32>,
}

impl<'a> WireRequest<'a> {
    fn new(request: &'a GenerationRequest, model: Option<&'a str>) -> Self {
        Self {
            prompt: &request.prompt,
            model,
            n: 1,
            size: request.size(),
            width: request.width,
            height: request.height,
            steps: request.steps,
        }
    }
}

#[async_trait]
impl ImageBackend for OpenWebUiBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let body = WireRequest::new(request, self.model.as_deref());

        tracing::debug!(
            endpoint = %self.endpoint,
            width = ?request.width,
            height = ?request.height,
            steps = ?request.steps,
            "sending image generation request"
        );

        let mut builder = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, "image generation request failed");
            if e.is_timeout() {
                ImageGenError::Generation(format!("backend timed out: {e}"))
            } else {
                ImageGenError::Generation(format!("backend unreachable: {e}"))
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = error_reason(status, &body);

            tracing::error!(status = %status, reason = %reason, "backend rejected image generation");

            return Err(ImageGenError::Generation(format!(
                "backend returned {}: {reason}",
                status.as_u16()
            )));
        }

        let payload: Value = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse image generation response");
            ImageGenError::Generation(format!("backend returned an unreadable response: {e}"))
        })?;

        log_response(&payload);

        reference::first_image(&payload).await
    }

    fn name(&self) -> &str {
        "open_webui"
    }
}

fn endpoint(base_url: &str) -> String {
    format!("{}{GENERATIONS_PATH}", base_url.trim_end_matches('/'))
}

/// Human readable reason for a failed call
///
/// The host reports errors as `{"detail": ...}`; anything else falls back
/// to the raw body or the status text.
fn error_reason(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());

    match detail {
        Some(Value::String(detail)) if !detail.is_empty() => detail,
        Some(detail) if !detail.is_null() => detail.to_string(),
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status.canonical_reason().unwrap_or("unknown error").to_string(),
    }
}

/// Full backend response, visible when the log level is `debug`
fn log_response(payload: &Value) {
    tracing::debug!(response = %payload, "image generation response received");
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;

    #[test]
    fn endpoint_trims_trailing_slash() {
        assert_eq!(
            endpoint("http://localhost:8080/"),
            "http://localhost:8080/api/v1/images/generations"
        );
        assert_eq!(
            endpoint("https://chat.example.com/webui"),
            "https://chat.example.com/webui/api/v1/images/generations"
        );
    }

    #[test]
    fn wire_request_with_size_and_steps() {
        let request = GenerationRequest::new("a red fox").with_size(512, 768).with_steps(25);

        let body = serde_json::to_value(WireRequest::new(&request, None)).unwrap();

        assert_eq!(
            body,
            json!({
                "prompt": "a red fox",
                "n": 1,
                "size": "512x768",
                "width": 512,
                "height": 768,
                "steps": 25
            })
        );
    }

    #[test]
    fn wire_request_prompt_only() {
        let request = GenerationRequest::new("a red fox");

        let body = serde_json::to_value(WireRequest::new(&request, Some("flux-dev"))).unwrap();

        assert_eq!(body, json!({ "prompt": "a red fox", "model": "flux-dev", "n": 1 }));
    }

    #[test]
    fn partial_size_is_not_sent_as_size() {
        let mut request = GenerationRequest::new("a red fox");
        request.width = Some(640);

        let body = serde_json::to_value(WireRequest::new(&request, None)).unwrap();

        assert!(body.get("size").is_none());
        assert_eq!(body["width"], 640);
        assert!(body.get("seed").is_none());
    }

    #[test]
    fn detail_is_preferred_reason() {
        let reason = error_reason(StatusCode::BAD_REQUEST, r#"{"detail": "ComfyUI is not reachable"}"#);
        assert_eq!(reason, "ComfyUI is not reachable");
    }

    #[test]
    fn structured_detail_is_serialized() {
        let reason = error_reason(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"msg": "field required"}]}"#,
        );
        assert_eq!(reason, r#"[{"msg":"field required"}]"#);
    }

    #[test]
    fn plain_body_and_empty_body() {
        assert_eq!(error_reason(StatusCode::BAD_GATEWAY, "upstream down\n"), "upstream down");
        assert_eq!(error_reason(StatusCode::SERVICE_UNAVAILABLE, ""), "Service Unavailable");
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn captured(max_level: tracing::Level, payload: &Value) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(max_level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || log_response(payload));

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn debug_logs_full_response() {
        let b64 = "A".repeat(500);
        let logged = captured(tracing::Level::DEBUG, &json!([{ "b64_json": b64 }]));

        assert!(logged.contains("image generation response received"));
        assert!(logged.contains(&b64));
    }

    #[test]
    fn response_is_not_logged_above_debug() {
        let logged = captured(tracing::Level::INFO, &json!([{ "url": "/api/v1/files/abc/content" }]));
        assert!(logged.is_empty());
    }
}
