//! Extraction stage: hand a fetchable PDF URL to the text-extraction service.
//!
//! The only stage with a hard deadline. The request carries a client-side
//! timeout; when it elapses the call fails with
//! [`RelayError::ExtractionTimeout`] and nothing needs cleaning up, since no
//! local resources were allocated for the upstream call.

use crate::config::RelayConfig;
use crate::error::RelayError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Something that turns a PDF URL into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<String, RelayError>;
}

/// Client for the kome.ai `pdf-to-text` tool.
#[derive(Debug, Clone)]
pub struct KomeClient {
    client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    text: Option<String>,
}

impl KomeClient {
    pub fn new(client: reqwest::Client, config: &RelayConfig) -> Self {
        Self {
            client,
            endpoint: config.extraction_endpoint.clone(),
            timeout_secs: config.extraction_timeout_secs,
        }
    }
}

#[async_trait]
impl TextExtractor for KomeClient {
    async fn extract(&self, url: &str) -> Result<String, RelayError> {
        info!("Requesting text extraction for {}", url);
        let start = Instant::now();

        // `.json()` also sets `Content-Type: application/json`.
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ExtractRequest { url })
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            warn!("Extraction rejected with HTTP {}", response.status());
            return Err(RelayError::ExtractionFailed {
                status: response.status().as_u16(),
            });
        }

        // The deadline covers the body as well as the headers.
        let body: ExtractResponse = response.json().await.map_err(|e| self.classify(e))?;
        let text = body
            .text
            .filter(|t| !t.is_empty())
            .ok_or(RelayError::NoTextExtracted)?;

        debug!(
            "Extracted {} chars in {}ms",
            text.chars().count(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }
}

impl KomeClient {
    fn classify(&self, e: reqwest::Error) -> RelayError {
        if e.is_timeout() {
            warn!("Extraction timed out after {}s", self.timeout_secs);
            RelayError::ExtractionTimeout {
                secs: self.timeout_secs,
            }
        } else {
            RelayError::from(e)
        }
    }
}
