//! HTTP adapter for a Surya OCR endpoint.
//!
//! Each call POSTs one base64 encoded image as
//! `{"json": {"mime_type": ..., "data": ...}}` and decodes the
//! `{"text": ..., "lines": [...]}` reply. Calls share a pooled
//! [`reqwest::Client`] but are otherwise independent; nothing is retried.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Request, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SuryaConfig;
use crate::context::Context;
use crate::engine::{OcrEngine, OcrError};
use crate::region::{OcrOutput, TextLine};

#[derive(Debug, Serialize)]
struct SuryaRequest<'a> {
    json: ImagePayload<'a>,
}

#[derive(Debug, Serialize)]
struct ImagePayload<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct SuryaResponse {
    text: String,
    #[serde(default)]
    lines: Option<Vec<TextLine>>,
}

impl From<SuryaResponse> for OcrOutput {
    fn from(resp: SuryaResponse) -> Self {
        OcrOutput {
            text: resp.text,
            lines: resp.lines,
        }
    }
}

pub struct SuryaOcrProvider {
    config: SuryaConfig,
    client: Client,
}

impl SuryaOcrProvider {
    pub fn new(config: SuryaConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: SuryaConfig, client: Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &SuryaConfig {
        &self.config
    }

    fn build_request(&self, image_data: &[u8], mime_type: &str) -> Result<Request, OcrError> {
        let body = SuryaRequest {
            json: ImagePayload {
                mime_type,
                data: STANDARD.encode(image_data),
            },
        };
        let body = serde_json::to_vec(&body).map_err(|e| OcrError::Request(Box::new(e)))?;

        let mut builder = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(token) = &self.config.token {
            builder = builder.bearer_auth(token);
        }
        builder.build().map_err(|e| OcrError::Request(Box::new(e)))
    }

    async fn send(&self, request: Request, page: u32) -> Result<OcrOutput, OcrError> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(OcrError::Transport)?;

        let status = response.status();
        info!(page, status = status.as_u16(), "Surya API responded");

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(OcrError::ReadBody)?;
        let parsed: SuryaResponse =
            serde_json::from_slice(&body).map_err(|source| OcrError::Decode {
                source,
                body: String::from_utf8_lossy(&body).into_owned(),
            })?;

        debug!(
            page,
            chars = parsed.text.len(),
            lines = parsed.lines.as_ref().map(Vec::len),
            "Decoded Surya response"
        );
        Ok(parsed.into())
    }
}

#[async_trait]
impl OcrEngine for SuryaOcrProvider {
    async fn process_image(
        &self,
        ctx: &Context,
        image_data: &[u8],
        page: u32,
    ) -> Result<OcrOutput, OcrError> {
        if !self.config.is_configured() {
            return Err(OcrError::Config(format!(
                "surya endpoint not set (configure {})",
                crate::config::ENDPOINT_VAR
            )));
        }

        let ctx = match self.config.timeout {
            Some(timeout) => ctx.child_with_timeout(timeout),
            None => ctx.clone(),
        };
        if let Some(err) = ctx.err() {
            return Err(err);
        }

        let mime_type = self.config.mime.resolve(image_data);
        let request = self.build_request(image_data, mime_type)?;
        info!(
            page,
            endpoint = %self.config.endpoint,
            bytes = image_data.len(),
            mime_type,
            authenticated = self.config.token.is_some(),
            "Sending image to Surya OCR"
        );

        // Dropping the in-flight future on cancellation releases its connection.
        tokio::select! {
            biased;
            err = ctx.done() => Err(err),
            result = self.send(request, page) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mime::MimeStrategy;

    #[test]
    fn test_request_envelope_shape() {
        let provider = SuryaOcrProvider::new(SuryaConfig::new("http://localhost:1/ocr"));
        let request = provider.build_request(b"abc", "image/jpeg").unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "http://localhost:1/ocr");
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert!(request.headers().get("authorization").is_none());

        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        let body: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"json": {"mime_type": "image/jpeg", "data": "YWJj"}})
        );
    }

    #[test]
    fn test_request_carries_bearer_token() {
        let config = SuryaConfig::new("http://localhost:1/ocr").with_token("tok");
        let request = SuryaOcrProvider::new(config)
            .build_request(b"abc", "image/jpeg")
            .unwrap();
        assert_eq!(request.headers().get("authorization").unwrap(), "Bearer tok");
    }

    #[test]
    fn test_request_uses_fixed_mime_type() {
        let mut config = SuryaConfig::new("http://localhost:1/ocr");
        config.mime = MimeStrategy::Fixed("image/webp".into());
        let provider = SuryaOcrProvider::new(config);
        let mime_type = provider.config().mime.resolve(b"abc");
        let request = provider.build_request(b"abc", mime_type).unwrap();
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        let body: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(body["json"]["mime_type"], "image/webp");
    }

    #[test]
    fn test_malformed_endpoint_is_a_request_error() {
        let provider = SuryaOcrProvider::new(SuryaConfig::new("not a url"));
        assert!(matches!(
            provider.build_request(b"abc", "image/jpeg"),
            Err(OcrError::Request(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_endpoint_fails_before_sending() {
        let provider = SuryaOcrProvider::new(SuryaConfig::default());
        let err = provider
            .process_image(&Context::background(), b"img", 3)
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Config(_)));
        assert!(err.to_string().contains("SURYA_ENDPOINT"));
    }

    #[tokio::test]
    async fn test_blank_endpoint_fails_as_config_error() {
        let config = SuryaConfig {
            endpoint: "  ".into(),
            ..SuryaConfig::default()
        };
        let err = SuryaOcrProvider::new(config)
            .process_image(&Context::background(), b"img", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Config(_)), "got {err}");
    }

    #[test]
    fn test_response_requires_text() {
        assert!(serde_json::from_str::<SuryaResponse>(r#"{"lines": []}"#).is_err());
        let resp: SuryaResponse =
            serde_json::from_str(r#"{"text": "ok", "page": 1, "extra": {"a": 1}}"#).unwrap();
        assert_eq!(resp.text, "ok");
        assert!(resp.lines.is_none());
    }
}
