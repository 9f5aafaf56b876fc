//! Input resolution: normalise whatever the caller handed us into a [`PdfUpload`].
//!
//! The HTTP handler builds a `PdfUpload` from the multipart `pdf` field; the
//! CLI builds one from a local path via [`read_local`]. Either way the rest of
//! the pipeline only ever sees bytes plus an optional client filename.
//!
//! No PDF validation happens here: the bytes are relayed as-is and the
//! extraction service is the judge of whether they are a readable document.

use crate::error::RelayError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A document submitted for relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfUpload {
    /// Filename the client sent, if any. Used for logging only; the relay
    /// generates its own upload name.
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

impl PdfUpload {
    pub fn new(filename: Option<String>, data: Vec<u8>) -> Self {
        Self { filename, data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

/// Read a local file into a [`PdfUpload`].
pub async fn read_local(path: impl AsRef<Path>) -> Result<PdfUpload, RelayError> {
    let path: PathBuf = path.as_ref().to_path_buf();

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(RelayError::FileNotFound { path });
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(RelayError::PermissionDenied { path });
        }
        Err(source) => return Err(RelayError::ReadFailed { path, source }),
    };

    if data.is_empty() {
        return Err(RelayError::PdfRequired);
    }

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    debug!("Read {} bytes from {}", data.len(), path.display());
    Ok(PdfUpload::new(filename, data))
}
