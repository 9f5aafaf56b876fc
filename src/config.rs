//! Configuration types for the relay.
//!
//! Everything the relay needs to know about its two upstream services lives in
//! [`RelayConfig`], built through [`RelayConfigBuilder`]. The defaults point at
//! the public tmpfiles.org and kome.ai endpoints, so `RelayConfig::default()`
//! is a working production configuration; tests and self-hosted deployments
//! override the endpoints.

use crate::error::RelayError;
use serde::{Deserialize, Serialize};

/// Default upload endpoint of the file host.
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://tmpfiles.org/api/v1/upload";

/// Prefix of direct-download links on the file host.
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://tmpfiles.org/dl";

/// Default text-extraction endpoint.
pub const DEFAULT_EXTRACTION_ENDPOINT: &str = "https://api.kome.ai/api/tools/pdf-to-text";

/// Configuration for the relay.
///
/// # Example
/// ```rust
/// use pdf2text_relay::RelayConfig;
///
/// let config = RelayConfig::builder()
///     .extraction_timeout_secs(30)
///     .max_upload_bytes(20 * 1024 * 1024)
///     .build()
///     .unwrap();
/// assert_eq!(config.extraction_timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Multipart upload endpoint of the file host.
    pub upload_endpoint: String,

    /// Prefix for direct-download links; the file id and filename are appended.
    pub download_base: String,

    /// JSON endpoint that turns a PDF URL into text.
    pub extraction_endpoint: String,

    /// Client-side timeout for the extraction call in seconds. Default: 60.
    pub extraction_timeout_secs: u64,

    /// Optional timeout for the upload call in seconds. Default: none.
    ///
    /// When unset the upload relies on the transport's own behaviour.
    pub upload_timeout_secs: Option<u64>,

    /// Largest inbound request body accepted, in bytes. Default: 100 MiB.
    pub max_upload_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            upload_endpoint: DEFAULT_UPLOAD_ENDPOINT.to_string(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
            extraction_endpoint: DEFAULT_EXTRACTION_ENDPOINT.to_string(),
            extraction_timeout_secs: 60,
            upload_timeout_secs: None,
            max_upload_bytes: 100 * 1024 * 1024,
        }
    }
}

impl RelayConfig {
    /// Create a new builder for `RelayConfig`.
    pub fn builder() -> RelayConfigBuilder {
        RelayConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RelayConfig`].
#[derive(Debug)]
pub struct RelayConfigBuilder {
    config: RelayConfig,
}

impl RelayConfigBuilder {
    pub fn upload_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.upload_endpoint = url.into();
        self
    }

    pub fn download_base(mut self, url: impl Into<String>) -> Self {
        self.config.download_base = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn extraction_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.extraction_endpoint = url.into();
        self
    }

    pub fn extraction_timeout_secs(mut self, secs: u64) -> Self {
        self.config.extraction_timeout_secs = secs;
        self
    }

    pub fn upload_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.config.upload_timeout_secs = secs;
        self
    }

    pub fn max_upload_bytes(mut self, n: usize) -> Self {
        self.config.max_upload_bytes = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RelayConfig, RelayError> {
        let c = &self.config;
        for (name, url) in [
            ("upload endpoint", &c.upload_endpoint),
            ("download base", &c.download_base),
            ("extraction endpoint", &c.extraction_endpoint),
        ] {
            reqwest::Url::parse(url).map_err(|e| {
                RelayError::InvalidConfig(format!("{name} '{url}' is not a valid URL: {e}"))
            })?;
        }
        if c.extraction_timeout_secs == 0 {
            return Err(RelayError::InvalidConfig(
                "Extraction timeout must be ≥ 1s".into(),
            ));
        }
        if c.upload_timeout_secs == Some(0) {
            return Err(RelayError::InvalidConfig(
                "Upload timeout must be ≥ 1s when set".into(),
            ));
        }
        if c.max_upload_bytes == 0 {
            return Err(RelayError::InvalidConfig(
                "Upload size limit must be > 0".into(),
            ));
        }
        Ok(self.config)
    }
}
