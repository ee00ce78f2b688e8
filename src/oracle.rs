//! The advice oracle: mantras, questions with or without a picture, and the
//! "What do I like?" profile. Every failure degrades to a fixed line.

mod client;
mod mock;
mod prompt;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;
use tracing::warn;

use crate::capture::{capture_jpeg, CaptureDevice};
use crate::error::EmpireError;

pub use client::GeminiClient;
pub use mock::{CannedBackend, FailingBackend};
pub use prompt::MOODS;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("oracle request timed out after {0}s")]
    Timeout(u64),

    #[error("oracle API error: {0}")]
    Api(String),

    #[error("failed to parse oracle response: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Base64 image sent alongside the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub fn from_jpeg_bytes(bytes: &[u8]) -> Self {
        Self { mime_type: "image/jpeg".into(), data: STANDARD.encode(bytes) }
    }

    /// Accepts a `data:image/...;base64,` URL or bare base64. Always labelled
    /// JPEG, which is what the mirror and the upload path produce.
    pub fn from_data_url(url: &str) -> Self {
        let data = url.split_once(',').map(|(_, d)| d).unwrap_or(url);
        Self { mime_type: "image/jpeg".into(), data: data.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdviceRequest {
    pub prompt: String,
    pub image: Option<InlineImage>,
    pub temperature: Option<f32>,
}

#[async_trait]
pub trait AdviceBackend: Send + Sync + std::fmt::Debug {
    /// Generated text; empty when the model produced none.
    async fn generate(&self, request: &AdviceRequest) -> Result<String, OracleError>;
}

#[async_trait]
impl<T: AdviceBackend + ?Sized> AdviceBackend for Box<T> {
    async fn generate(&self, request: &AdviceRequest) -> Result<String, OracleError> { (**self).generate(request).await }
}

#[derive(Debug)]
pub struct Oracle<B> {
    backend: B,
}

impl<B: AdviceBackend> Oracle<B> {
    pub fn new(backend: B) -> Self { Self { backend } }

    pub fn backend(&self) -> &B { &self.backend }

    async fn consult(&self, request: AdviceRequest, empty: &str, failed: &str) -> String {
        match self.backend.generate(&request).await {
            Ok(text) if text.trim().is_empty() => empty.to_string(),
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "oracle request failed");
                failed.to_string()
            }
        }
    }

    pub async fn mantra(&self, mood: &str) -> String {
        let request = AdviceRequest { prompt: prompt::mantra(mood), image: None, temperature: Some(prompt::MANTRA_TEMPERATURE) };
        self.consult(request, prompt::MANTRA_EMPTY, prompt::MANTRA_FAILED).await
    }

    /// `None` when there is neither a question nor a picture.
    pub async fn ask(&self, question: &str, image: Option<InlineImage>) -> Option<String> {
        let (request, empty) = match image {
            Some(image) => {
                let request = AdviceRequest { prompt: prompt::image_advice(question), image: Some(image), temperature: Some(prompt::ADVICE_TEMPERATURE) };
                (request, prompt::IMAGE_EMPTY)
            }
            None if question.trim().is_empty() => return None,
            None => {
                let request = AdviceRequest { prompt: prompt::advice(question), image: None, temperature: Some(prompt::ADVICE_TEMPERATURE) };
                (request, prompt::ADVICE_EMPTY)
            }
        };
        Some(self.consult(request, empty, prompt::ADVICE_FAILED).await)
    }

    /// `None` for blank input.
    pub async fn profile(&self, input: &str) -> Option<String> {
        if input.trim().is_empty() { return None; }
        let request = AdviceRequest { prompt: prompt::profile(input), image: None, temperature: None };
        Some(self.consult(request, prompt::PROFILE_FAILED, prompt::PROFILE_FAILED).await)
    }

    /// Take one mirror snapshot and ask about it. The camera is released
    /// before the request goes out.
    pub async fn consult_camera(&self, device: &dyn CaptureDevice, question: &str) -> Result<String, EmpireError> {
        let frame = capture_jpeg(device).await?;
        let image = InlineImage::from_jpeg_bytes(&frame);
        Ok(self.ask(question, Some(image)).await.unwrap_or_default())
    }
}
