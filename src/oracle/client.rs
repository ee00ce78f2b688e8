use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use super::{AdviceBackend, AdviceRequest, OracleError};
use crate::config::OracleSettings;

/// `generateContent` over HTTPS.
#[derive(Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    url: Url,
    api_key: String,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(settings: &OracleSettings) -> Result<Self, OracleError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| OracleError::Configuration("no API key configured (set GEMINI_API_KEY)".into()))?;
        let url = Self::endpoint_url(&settings.endpoint, &settings.model)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| OracleError::Configuration(e.to_string()))?;
        Ok(Self { client, url, api_key, timeout_secs: settings.timeout_secs })
    }

    pub fn url(&self) -> &Url { &self.url }

    fn endpoint_url(endpoint: &str, model: &str) -> Result<Url, OracleError> {
        let mut base = endpoint.trim().to_string();
        if !base.ends_with('/') { base.push('/'); }
        Url::parse(&base)
            .and_then(|u| u.join(&format!("v1beta/models/{}:generateContent", model)))
            .map_err(|e| OracleError::Configuration(format!("invalid endpoint `{}`: {}", endpoint, e)))
    }

    fn request_body(request: &AdviceRequest) -> Value {
        let mut parts = Vec::new();
        if let Some(image) = &request.image {
            parts.push(json!({ "inlineData": { "mimeType": image.mime_type, "data": image.data } }));
        }
        parts.push(json!({ "text": request.prompt }));
        let mut body = json!({ "contents": [{ "parts": parts }] });
        if let Some(t) = request.temperature {
            body["generationConfig"] = json!({ "temperature": t });
        }
        body
    }

    /// Text of the first candidate. A reply with no candidates (for example a
    /// blocked prompt) yields an empty string.
    fn response_text(body: &Value) -> Result<String, OracleError> {
        if !body.is_object() {
            return Err(OracleError::Parse(format!("unexpected response format: {}", body)));
        }
        let Some(parts) = body
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
        else {
            return Ok(String::new());
        };
        Ok(parts.iter().filter_map(|p| p.get("text").and_then(|t| t.as_str())).collect())
    }
}

#[async_trait]
impl AdviceBackend for GeminiClient {
    async fn generate(&self, request: &AdviceRequest) -> Result<String, OracleError> {
        let body = Self::request_body(request);
        debug!(url = %self.url, with_image = request.image.is_some(), "sending oracle request");

        let response = self
            .client
            .post(self.url.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| if e.is_timeout() { OracleError::Timeout(self.timeout_secs) } else { OracleError::Http(e.to_string()) })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(%status, "oracle API returned error");
            return Err(OracleError::Api(format!("HTTP {}: {}", status, text)));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| OracleError::Parse(format!("failed to parse API response: {}", e)))?;
        Self::response_text(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::InlineImage;

    #[test]
    fn url_targets_model() {
        let url = GeminiClient::endpoint_url("https://generativelanguage.googleapis.com", "gemini-3-flash-preview").unwrap();
        assert_eq!(url.as_str(), "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent");
        let proxied = GeminiClient::endpoint_url("http://localhost:8080/proxy", "m").unwrap();
        assert_eq!(proxied.as_str(), "http://localhost:8080/proxy/v1beta/models/m:generateContent");
        assert!(GeminiClient::endpoint_url("not a url", "m").is_err());
    }

    #[test]
    fn missing_key_is_configuration_error() {
        let err = GeminiClient::new(&OracleSettings::default()).unwrap_err();
        assert!(matches!(err, OracleError::Configuration(_)));
    }

    #[test]
    fn body_puts_image_before_text() {
        let req = AdviceRequest {
            prompt: "look".into(),
            image: Some(InlineImage::from_data_url("data:image/jpeg;base64,AAAA")),
            temperature: Some(0.8),
        };
        let body = GeminiClient::request_body(&req);
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts[0]["inlineData"]["data"], "AAAA");
        assert_eq!(parts[1]["text"], "look");
        assert!(body["generationConfig"]["temperature"].as_f64().unwrap() > 0.79);

        let plain = GeminiClient::request_body(&AdviceRequest { prompt: "p".into(), image: None, temperature: None });
        assert!(plain.get("generationConfig").is_none());
    }

    #[test]
    fn response_text_joins_parts() {
        let body = json!({ "candidates": [{ "content": { "parts": [{ "text": "slay " }, { "text": "queen" }] } }] });
        assert_eq!(GeminiClient::response_text(&body).unwrap(), "slay queen");
        assert_eq!(GeminiClient::response_text(&json!({ "promptFeedback": {} })).unwrap(), "");
        assert!(GeminiClient::response_text(&json!("nope")).is_err());
    }
}
