//! Error types for the pdf2text-relay library.
//!
//! Every failure the relay can hit is one variant of [`RelayError`]. The
//! `Display` string of each variant is exactly the `message` a client sees in
//! the JSON envelope, so the handler never inspects free-form error text.
//!
//! Variants fall into three groups:
//!
//! * **Routing / validation** — detected before any outbound call
//!   (wrong method, wrong path, missing `pdf` field).
//! * **Upstream** — the file host or the extraction service misbehaved.
//! * **Local** — configuration and CLI file-reading failures that never reach
//!   an HTTP client.

use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Message used when an error carries no text of its own.
pub const FALLBACK_MESSAGE: &str = "Error processing PDF";

/// All errors returned by the pdf2text-relay library.
#[derive(Debug, Error)]
pub enum RelayError {
    // ── Routing / validation ──────────────────────────────────────────────
    /// Inbound method was neither `POST` nor `OPTIONS`.
    #[error("Only POST requests are allowed")]
    MethodNotAllowed,

    /// Inbound path does not start with `/pdf`.
    #[error("Endpoint not found. Use /pdf")]
    EndpointNotFound,

    /// The multipart body had no (or an empty) `pdf` field.
    #[error("PDF file required")]
    PdfRequired,

    // ── File host ─────────────────────────────────────────────────────────
    /// The upload endpoint answered with a non-2xx status.
    #[error("Failed to upload PDF")]
    UploadFailed { status: u16 },

    /// The upload response had no `data.url`.
    #[error("No upload URL received")]
    NoUploadUrl,

    /// The upload URL had no digit-only path segment to build a download link from.
    #[error("Invalid upload URL format")]
    MalformedUploadUrl { url: String },

    // ── Extraction service ────────────────────────────────────────────────
    /// The extraction endpoint answered with a non-2xx status.
    #[error("Failed to extract text from PDF")]
    ExtractionFailed { status: u16 },

    /// No extraction response arrived within the configured window.
    #[error("Text extraction timed out after {secs}s")]
    ExtractionTimeout { secs: u64 },

    /// The extraction response had a missing or empty `text` field.
    #[error("No text extracted from PDF")]
    NoTextExtracted,

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Transport failure, undecodable body, or anything else unexpected.
    #[error("{0}")]
    Unexpected(String),

    // ── Local ─────────────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RelayError {
    /// HTTP status for this error when it is rendered by the handler.
    ///
    /// Routing errors keep their own codes; everything else is a 400.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::EndpointNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Human-readable message for the response envelope.
    pub fn message(&self) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            msg
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        RelayError::Unexpected(e.to_string())
    }
}
