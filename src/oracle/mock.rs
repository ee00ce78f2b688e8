use std::sync::Mutex;

use async_trait::async_trait;

use super::{AdviceBackend, AdviceRequest, OracleError};

/// Answers every request with the same text and remembers what was asked.
#[derive(Debug, Default)]
pub struct CannedBackend {
    reply: String,
    requests: Mutex<Vec<AdviceRequest>>,
}

impl CannedBackend {
    pub fn new(reply: impl Into<String>) -> Self { Self { reply: reply.into(), requests: Mutex::new(Vec::new()) } }

    pub fn requests(&self) -> Vec<AdviceRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AdviceBackend for CannedBackend {
    async fn generate(&self, request: &AdviceRequest) -> Result<String, OracleError> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }
        Ok(self.reply.clone())
    }
}

/// Always errors; stands in when no API key is configured.
#[derive(Debug, Clone)]
pub struct FailingBackend {
    message: String,
}

impl FailingBackend {
    pub fn new(message: impl Into<String>) -> Self { Self { message: message.into() } }
}

#[async_trait]
impl AdviceBackend for FailingBackend {
    async fn generate(&self, _request: &AdviceRequest) -> Result<String, OracleError> {
        Err(OracleError::Configuration(self.message.clone()))
    }
}
