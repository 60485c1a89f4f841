use async_trait::async_trait;
use base64::Engine as _;
use std::time::Duration;
use thiserror::Error;

use crate::config::{OcrConfig, VisionCredentials};

const ANNOTATE_URL: &str = "https://vision.googleapis.com/v1/images:annotate";

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected OCR response: {0}")]
    Response(String),

    #[error("OCR is not configured")]
    Disabled,
}

/// Opaque text-recognition service.
///
/// `Ok(None)` means the provider answered but found no text on the image;
/// both that and any `Err` surface to the user as an unreadable ticket.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize_text(&self, image: &[u8]) -> Result<Option<String>, OcrError>;
}

/// Google Cloud Vision `images:annotate` client running TEXT_DETECTION.
pub struct GoogleVisionOcr {
    http: reqwest::Client,
    api_key: String,
    max_retries: u32,
}

impl GoogleVisionOcr {
    pub fn new(credentials: VisionCredentials, policy: OcrConfig) -> Result<Self, OcrError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(policy.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: credentials.api_key,
            max_retries: policy.max_retries,
        })
    }

    async fn annotate(&self, image: &[u8]) -> Result<Option<String>, OcrError> {
        let content = base64::engine::general_purpose::STANDARD.encode(image);
        let body = serde_json::json!({
            "requests": [{
                "image": {"content": content},
                "features": [{"type": "TEXT_DETECTION"}],
            }]
        });

        let response: serde_json::Value = self
            .http
            .post(ANNOTATE_URL)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let annotation = &response["responses"][0];
        if let Some(message) = annotation["error"]["message"].as_str() {
            return Err(OcrError::Response(message.to_string()));
        }

        // The first annotation aggregates the full detected text.
        let text = annotation["textAnnotations"][0]["description"]
            .as_str()
            .map(|t| t.to_string());
        Ok(text)
    }
}

#[async_trait]
impl OcrEngine for GoogleVisionOcr {
    async fn recognize_text(&self, image: &[u8]) -> Result<Option<String>, OcrError> {
        let mut attempt = 0;
        loop {
            match self.annotate(image).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!("OCR attempt {attempt} failed, retrying: {e}");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Stand-in used when OCR credentials are missing or invalid: every photo
/// is reported as unreadable instead of failing the whole process.
pub struct DisabledOcr;

#[async_trait]
impl OcrEngine for DisabledOcr {
    async fn recognize_text(&self, _image: &[u8]) -> Result<Option<String>, OcrError> {
        Err(OcrError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_engine_always_fails() {
        let result = DisabledOcr.recognize_text(&[1, 2, 3]).await;
        assert!(matches!(result, Err(OcrError::Disabled)));
    }
}
