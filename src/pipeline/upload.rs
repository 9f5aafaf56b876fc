//! File-host stage: push the PDF bytes, get back a direct-download URL.
//!
//! The host answers an upload with a *view* page URL such as
//! `https://tmpfiles.org/12345/view/pdf_1.pdf`, which serves HTML, not the
//! file. The raw file lives under a download prefix keyed by the numeric id,
//! so this stage rewrites the view URL into
//! `<download_base>/<id>/<filename>` before handing it on.

use crate::config::RelayConfig;
use crate::error::RelayError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Something that can host a PDF and hand back a fetchable URL.
#[async_trait]
pub trait FileHost: Send + Sync {
    /// Upload `data` under `filename`; return a URL the extractor can fetch.
    async fn upload(&self, data: Vec<u8>, filename: &str) -> Result<String, RelayError>;
}

/// Client for the tmpfiles.org upload API.
#[derive(Debug, Clone)]
pub struct TmpFilesClient {
    client: reqwest::Client,
    endpoint: String,
    download_base: String,
    timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    #[serde(default)]
    url: Option<String>,
}

impl TmpFilesClient {
    pub fn new(client: reqwest::Client, config: &RelayConfig) -> Self {
        Self {
            client,
            endpoint: config.upload_endpoint.clone(),
            download_base: config.download_base.clone(),
            timeout: config.upload_timeout_secs.map(Duration::from_secs),
        }
    }
}

#[async_trait]
impl FileHost for TmpFilesClient {
    async fn upload(&self, data: Vec<u8>, filename: &str) -> Result<String, RelayError> {
        info!("Uploading {} ({} bytes) to {}", filename, data.len(), self.endpoint);

        let part = Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            warn!("Upload rejected with HTTP {}", response.status());
            return Err(RelayError::UploadFailed {
                status: response.status().as_u16(),
            });
        }

        let body: UploadResponse = response.json().await?;
        let view_url = body
            .data
            .and_then(|d| d.url)
            .filter(|u| !u.is_empty())
            .ok_or(RelayError::NoUploadUrl)?;
        debug!("File host returned view URL {}", view_url);

        let url = download_url(&self.download_base, &view_url, filename)?;
        info!("Uploaded; download URL {}", url);
        Ok(url)
    }
}

/// First path segment of `url` made only of ASCII digits.
///
/// Segments are scanned left to right after splitting on `/`, so with several
/// numeric segments the earliest wins.
pub fn file_id(url: &str) -> Option<&str> {
    url.split('/').find(|part| DIGITS.is_match(part))
}

/// Rewrite a host view URL into `<download_base>/<id>/<filename>`.
pub fn download_url(download_base: &str, view_url: &str, filename: &str) -> Result<String, RelayError> {
    let id = file_id(view_url).ok_or_else(|| RelayError::MalformedUploadUrl {
        url: view_url.to_string(),
    })?;
    Ok(format!(
        "{}/{}/{}",
        download_base.trim_end_matches('/'),
        id,
        filename
    ))
}
