//! HTTP client for the third-party text-recognition service.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

/// Recognition service endpoint.
const OCR_API_URL: &str = "https://api.ocr.space/parse/image";

/// Hard cap on the recognition round trip so a hung call cannot pin a
/// chat handler indefinitely.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("recognition request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("recognition service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("recognition service error: {0}")]
    Api(String),

    #[error("no text extracted from image")]
    NoText,
}

/// Seam for the recognition call, so the guarded reader can be exercised
/// without the network.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in an image. An empty result is an error, not an
    /// empty string.
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrApiResponse {
    #[serde(default)]
    parsed_results: Vec<ParsedResult>,
    #[serde(default)]
    error_message: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParsedResult {
    #[serde(default)]
    parsed_text: String,
}

/// Client for the OCR.space parse API.
pub struct OcrClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl OcrClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, OCR_API_URL)
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl TextRecognizer for OcrClient {
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);

        let form = reqwest::multipart::Form::new()
            .text("base64Image", format!("data:image/jpeg;base64,{encoded}"))
            .text("apikey", self.api_key.clone())
            .text("language", "eng")
            .text("isOverlayRequired", "false")
            .text("detectOrientation", "true")
            .text("scale", "true")
            // Engine 2 handles rotated and low-contrast receipts better.
            .text("OCREngine", "2");

        info!(size = image.len(), "Calling recognition service");
        let response = self
            .http
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OcrError::Status(status));
        }

        let body: OcrApiResponse = response.json().await?;

        if let Some(text) = body.parsed_results.first() {
            if !text.parsed_text.is_empty() {
                return Ok(text.parsed_text.clone());
            }
        }

        if let Some(message) = body.error_message.first() {
            error!(error = %message, "Recognition service reported an error");
            return Err(OcrError::Api(message.clone()));
        }

        Err(OcrError::NoText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_successful_response_body() {
        let json = r#"{"ParsedResults":[{"ParsedText":"SuperMart\nTOTAL: 5.00"}],"OCRExitCode":1}"#;
        let body: OcrApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.parsed_results[0].parsed_text, "SuperMart\nTOTAL: 5.00");
        assert!(body.error_message.is_empty());
    }

    #[test]
    fn parses_error_response_body() {
        let json = r#"{"ErrorMessage":["Invalid API key"],"OCRExitCode":99}"#;
        let body: OcrApiResponse = serde_json::from_str(json).unwrap();
        assert!(body.parsed_results.is_empty());
        assert_eq!(body.error_message[0], "Invalid API key");
    }
}
