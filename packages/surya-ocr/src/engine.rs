use async_trait::async_trait;
use thiserror::Error;

use crate::context::Context;
use crate::region::OcrOutput;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("failed to build HTTP request: {0}")]
    Request(#[source] BoxError),
    #[error("failed to send HTTP request: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("request cancelled")]
    Cancelled,
    #[error("request deadline exceeded")]
    DeadlineExceeded,
    #[error("surya API returned non-200 status code: {status}, body: {body}")]
    Status { status: u16, body: String },
    #[error("failed to read surya API response body: {0}")]
    ReadBody(#[source] reqwest::Error),
    #[error("failed to unmarshal surya API response: {source}, body: {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

impl OcrError {
    /// True when the call was aborted by its [`Context`] rather than failing on its own.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, OcrError::Cancelled | OcrError::DeadlineExceeded)
    }
}

/// A source of OCR results for single page images.
///
/// Implementations hold no per-call state, so one instance can serve
/// concurrent callers.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Extracts text from `image_data`. `page` is only used for diagnostics.
    async fn process_image(
        &self,
        ctx: &Context,
        image_data: &[u8],
        page: u32,
    ) -> Result<OcrOutput, OcrError>;
}
