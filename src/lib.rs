//! # pdf2text-relay
//!
//! An HTTP relay that turns an uploaded PDF into plain text by delegating to
//! two external services: a file host that gives the document a public URL,
//! and a text-extraction service that reads the PDF behind that URL.
//!
//! Nothing is parsed, stored, or cached locally. Each request is two awaited
//! outbound calls in series plus error translation into a JSON envelope.
//!
//! ## Request Lifecycle
//!
//! ```text
//! POST /pdf (multipart, field `pdf`)
//!  │
//!  ├─ 1. Route    OPTIONS → 204 · non-POST → 405 · non-/pdf → 404
//!  ├─ 2. Form     read the `pdf` field (missing/empty → 400)
//!  ├─ 3. Upload   file host → view URL → direct-download URL
//!  ├─ 4. Extract  extraction service (60 s deadline) → text
//!  └─ 5. Respond  {"success":true,"text":…} or {"success":false,"message":…}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2text_relay::{server, Relay, RelayConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let relay = Relay::new(RelayConfig::default())?;
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8787").await?;
//!     server::serve(listener, Arc::new(relay)).await?;
//!     Ok(())
//! }
//! ```
//!
//! Or relay a single document without running a server:
//!
//! ```rust,no_run
//! use pdf2text_relay::{Relay, RelayConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let relay = Relay::new(RelayConfig::default())?;
//! let text = relay.process_file("document.pdf").await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2text` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod envelope;
pub mod error;
pub mod pipeline;
pub mod relay;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RelayConfig, RelayConfigBuilder};
pub use envelope::{ResponseEnvelope, CORS_HEADERS};
pub use error::RelayError;
pub use pipeline::{FileHost, KomeClient, PdfUpload, TextExtractor, TmpFilesClient};
pub use relay::Relay;
pub use server::router;
