//! Pipeline stages for relaying a PDF to text.
//!
//! Each submodule implements exactly one step, and the two network stages
//! sit behind a trait so the orchestrator can run against doubles.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ upload ──▶ extract
//! (bytes)   (file host → download URL)   (URL → text)
//! ```
//!
//! 1. [`input`]   — the submitted bytes, from a multipart field or a local path
//! 2. [`upload`]  — push to the file host, rewrite its view URL to a raw download URL
//! 3. [`extract`] — ask the extraction service for the text behind that URL;
//!    the only stage with a deadline

pub mod extract;
pub mod input;
pub mod upload;

pub use extract::{KomeClient, TextExtractor};
pub use input::PdfUpload;
pub use upload::{FileHost, TmpFilesClient};
