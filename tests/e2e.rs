//! End-to-end tests against the live public services.
//!
//! These tests upload a small generated PDF to tmpfiles.org and ask kome.ai to
//! extract it. They are gated behind the `E2E_ENABLED` environment variable so
//! they do not run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use pdf2text_relay::{router, PdfUpload, Relay, RelayConfig, ResponseEnvelope};
use std::io::Write;
use std::sync::Arc;

/// One page, one line of Helvetica: "Hello world".
const HELLO_PDF: &[u8] = b"%PDF-1.4
1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj
2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj
3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >> endobj
4 0 obj << /Length 44 >> stream
BT /F1 24 Tf 72 700 Td (Hello world) Tj ET
endstream endobj
5 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj
trailer << /Root 1 0 R >>
%%EOF
";

/// Skip this test unless E2E_ENABLED is set.
macro_rules! e2e_skip_unless_enabled {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    }};
}

#[tokio::test]
async fn test_live_relay_extracts_text() {
    e2e_skip_unless_enabled!();

    let relay = Relay::new(RelayConfig::default()).expect("default config is valid");
    let text = relay
        .process(PdfUpload::new(Some("hello.pdf".into()), HELLO_PDF.to_vec()))
        .await
        .expect("live relay should succeed");

    println!("Extracted: {text:?}");
    assert!(text.contains("Hello"), "got: {text:?}");
}

#[tokio::test]
async fn test_live_process_file() {
    e2e_skip_unless_enabled!();

    let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    tmp.write_all(HELLO_PDF).unwrap();

    let relay = Relay::new(RelayConfig::default()).unwrap();
    let text = relay
        .process_file(tmp.path())
        .await
        .expect("live relay should succeed");
    assert!(!text.is_empty());
}

#[tokio::test]
async fn test_live_http_round_trip() {
    e2e_skip_unless_enabled!();

    let relay = Relay::new(RelayConfig::default()).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(Arc::new(relay))).await.unwrap();
    });

    let form = reqwest::multipart::Form::new().part(
        "pdf",
        reqwest::multipart::Part::bytes(HELLO_PDF.to_vec()).file_name("hello.pdf"),
    );
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/pdf"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    let status = resp.status();
    let envelope: ResponseEnvelope = resp.json().await.unwrap();
    println!("{status}: {envelope:?}");
    assert_eq!(status.as_u16(), 200);
    assert!(envelope.success);
    assert!(envelope.text.unwrap_or_default().contains("Hello"));
}
