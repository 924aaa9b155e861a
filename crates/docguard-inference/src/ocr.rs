//! HTTP text-extraction (OCR) backend.
//!
//! Thin client for the external text-extraction service. Failures surface as
//! [`Error::Extraction`] so callers can fall back to a secondary extraction
//! path without inspecting transport details.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use docguard_core::{Error, Result, TextExtraction, TextExtractionBackend};

/// Configuration for the HTTP OCR backend.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Base URL of the extraction service.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl OcrConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DOCGUARD_OCR_URL` | `http://localhost:8200` |
    /// | `DOCGUARD_OCR_TIMEOUT_SECS` | `30` |
    pub fn from_env() -> Self {
        let base_url = std::env::var("DOCGUARD_OCR_URL")
            .unwrap_or_else(|_| "http://localhost:8200".to_string());
        let timeout_secs = std::env::var("DOCGUARD_OCR_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(docguard_core::defaults::OCR_TIMEOUT_SECS);

        Self {
            base_url,
            timeout_secs,
        }
    }
}

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    image_path: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    full_text: String,
    confidence: f32,
}

/// Text-extraction backend over the external OCR service.
pub struct HttpOcrBackend {
    client: Client,
    config: OcrConfig,
}

impl HttpOcrBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: OcrConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        info!(base_url = %config.base_url, "Initializing OCR backend");

        Self { client, config }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::new(OcrConfig::from_env())
    }
}

#[async_trait]
impl TextExtractionBackend for HttpOcrBackend {
    async fn extract_text(&self, image_path: &str) -> Result<TextExtraction> {
        let url = format!("{}/extract", self.config.base_url);
        debug!(image_path, "requesting text extraction");

        let response = self
            .client
            .post(&url)
            .json(&ExtractRequest { image_path })
            .send()
            .await
            .map_err(|e| Error::Extraction(format!("extraction request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Extraction(format!(
                "extraction service returned {}",
                status
            )));
        }

        let parsed: ExtractResponse = response
            .json()
            .await
            .map_err(|e| Error::Extraction(format!("invalid extraction response: {}", e)))?;

        debug!(
            text_len = parsed.full_text.len(),
            confidence = parsed.confidence,
            "text extraction complete"
        );

        Ok(TextExtraction {
            full_text: parsed.full_text,
            confidence: parsed.confidence,
        })
    }
}
