//! Orchestration: upload, then extract.
//!
//! [`Relay`] is the only long-lived object in the system. It holds the two
//! upstream clients behind `Arc<dyn …>` and is shared read-only across all
//! requests; every call to [`Relay::process`] is independent of every other.

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::pipeline::{FileHost, KomeClient, PdfUpload, TextExtractor, TmpFilesClient};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Sequential upload → extract pipeline.
#[derive(Clone)]
pub struct Relay {
    config: RelayConfig,
    host: Arc<dyn FileHost>,
    extractor: Arc<dyn TextExtractor>,
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("config", &self.config)
            .field("host", &"<dyn FileHost>")
            .field("extractor", &"<dyn TextExtractor>")
            .finish()
    }
}

impl Relay {
    /// Build a relay against the services named in `config`.
    ///
    /// Both clients share one `reqwest::Client` and therefore one connection pool.
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RelayError::InvalidConfig(format!("HTTP client: {e}")))?;

        let host = Arc::new(TmpFilesClient::new(client.clone(), &config));
        let extractor = Arc::new(KomeClient::new(client, &config));
        Ok(Self {
            config,
            host,
            extractor,
        })
    }

    /// Build a relay from pre-constructed collaborators.
    pub fn with_services(
        config: RelayConfig,
        host: Arc<dyn FileHost>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            config,
            host,
            extractor,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Relay one document: upload it, then extract its text.
    ///
    /// # Errors
    /// - [`RelayError::PdfRequired`] when `upload` has no bytes
    /// - any upstream error from the file host or the extractor, unchanged
    pub async fn process(&self, upload: PdfUpload) -> Result<String, RelayError> {
        if upload.is_empty() {
            return Err(RelayError::PdfRequired);
        }
        let start = Instant::now();

        // ── Step 1: Name the upload ──────────────────────────────────────────
        let filename = upload_filename();
        info!(
            "Relaying {} ({} bytes) as {}",
            upload.filename.as_deref().unwrap_or("<unnamed>"),
            upload.len(),
            filename
        );

        // ── Step 2: Host the file ────────────────────────────────────────────
        let url = self.host.upload(upload.data, &filename).await?;

        // ── Step 3: Extract ──────────────────────────────────────────────────
        let text = self.extractor.extract(&url).await?;

        info!(
            "Relay of {} complete: {} chars in {}ms",
            filename,
            text.chars().count(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }

    /// Read a local file and relay it.
    pub async fn process_file(&self, path: impl AsRef<Path>) -> Result<String, RelayError> {
        let upload = crate::pipeline::input::read_local(path).await?;
        self.process(upload).await
    }
}

/// `pdf_<epoch-millis>.pdf` — unique enough to avoid collisions on the host.
pub fn upload_filename() -> String {
    format!("pdf_{}.pdf", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records what it was asked to host and answers with a fixed URL.
    #[derive(Default)]
    struct RecordingHost {
        seen: Mutex<Vec<(usize, String)>>,
    }

    #[async_trait]
    impl FileHost for RecordingHost {
        async fn upload(&self, data: Vec<u8>, filename: &str) -> Result<String, RelayError> {
            self.seen.lock().unwrap().push((data.len(), filename.to_string()));
            Ok(format!("https://tmpfiles.org/dl/1/{filename}"))
        }
    }

    struct FailingHost;

    #[async_trait]
    impl FileHost for FailingHost {
        async fn upload(&self, _data: Vec<u8>, _filename: &str) -> Result<String, RelayError> {
            Err(RelayError::UploadFailed { status: 500 })
        }
    }

    struct EchoExtractor;

    #[async_trait]
    impl TextExtractor for EchoExtractor {
        async fn extract(&self, url: &str) -> Result<String, RelayError> {
            Ok(format!("text of {url}"))
        }
    }

    #[test]
    fn filename_shape() {
        let name = upload_filename();
        assert!(name.starts_with("pdf_"), "got: {name}");
        assert!(name.ends_with(".pdf"), "got: {name}");
        let millis = &name["pdf_".len()..name.len() - ".pdf".len()];
        assert!(millis.parse::<i64>().unwrap() > 0);
    }

    #[tokio::test]
    async fn uploads_then_extracts() {
        let host = Arc::new(RecordingHost::default());
        let relay = Relay::with_services(
            RelayConfig::default(),
            host.clone(),
            Arc::new(EchoExtractor),
        );

        let text = relay
            .process(PdfUpload::new(Some("doc.pdf".into()), b"%PDF-1.4".to_vec()))
            .await
            .unwrap();

        let seen = host.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, 8);
        assert!(seen[0].1.starts_with("pdf_"), "client filename must not be reused");
        assert_eq!(text, format!("text of https://tmpfiles.org/dl/1/{}", seen[0].1));
    }

    #[tokio::test]
    async fn upload_failure_skips_extraction() {
        let relay = Relay::with_services(
            RelayConfig::default(),
            Arc::new(FailingHost),
            Arc::new(EchoExtractor),
        );
        let err = relay
            .process(PdfUpload::new(None, b"x".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::UploadFailed { status: 500 }));
    }

    #[tokio::test]
    async fn empty_upload_is_rejected_before_any_call() {
        let host = Arc::new(RecordingHost::default());
        let relay = Relay::with_services(
            RelayConfig::default(),
            host.clone(),
            Arc::new(EchoExtractor),
        );
        let err = relay.process(PdfUpload::new(None, Vec::new())).await.unwrap_err();
        assert!(matches!(err, RelayError::PdfRequired));
        assert!(host.seen.lock().unwrap().is_empty());
    }
}
