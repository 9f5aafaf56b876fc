//! HTTP surface: one handler, registered as the router's fallback.
//!
//! Routing is decided inside [`handle`] rather than by axum's method routers
//! because the checks run in a fixed order that axum would not reproduce:
//!
//! 1. `OPTIONS` on any path → 204 preflight
//! 2. any other non-`POST` method → 405
//! 3. a path not starting with `/pdf` → 404
//! 4. multipart body without a `pdf` field → 400
//!
//! Everything after that is [`Relay::process`]; its errors are rendered as
//! 400 envelopes by [`RelayError`]'s `IntoResponse` impl.

use crate::envelope::{preflight, ResponseEnvelope};
use crate::error::RelayError;
use crate::pipeline::PdfUpload;
use crate::relay::Relay;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Path prefix the relay answers on.
pub const PDF_PATH_PREFIX: &str = "/pdf";

/// Name of the multipart field carrying the document.
pub const PDF_FIELD: &str = "pdf";

/// Build the application router around a shared [`Relay`].
pub fn router(relay: Arc<Relay>) -> Router {
    let body_limit = DefaultBodyLimit::max(relay.config().max_upload_bytes);
    Router::new()
        .fallback(handle)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

/// Serve the relay on `listener` until Ctrl-C or SIGTERM.
pub async fn serve(listener: TcpListener, relay: Arc<Relay>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("pdf2text relay listening on http://{}{}", addr, PDF_PATH_PREFIX);
    }
    axum::serve(listener, router(relay))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server shutdown complete");
    Ok(())
}

/// The single request handler.
pub async fn handle(State(relay): State<Arc<Relay>>, request: Request) -> Response {
    if request.method() == Method::OPTIONS {
        return preflight();
    }

    match dispatch(&relay, request).await {
        Ok(text) => ResponseEnvelope::success(text).into_response_with(StatusCode::OK),
        Err(e) => {
            match &e {
                RelayError::MethodNotAllowed
                | RelayError::EndpointNotFound
                | RelayError::PdfRequired => debug!("Rejected request: {}", e),
                _ => warn!("Relay failed: {}", e),
            }
            e.into_response()
        }
    }
}

async fn dispatch(relay: &Relay, request: Request) -> Result<String, RelayError> {
    if request.method() != Method::POST {
        return Err(RelayError::MethodNotAllowed);
    }
    if !request.uri().path().starts_with(PDF_PATH_PREFIX) {
        return Err(RelayError::EndpointNotFound);
    }

    let multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| RelayError::Unexpected(e.body_text()))?;
    let upload = read_pdf_field(multipart)
        .await?
        .ok_or(RelayError::PdfRequired)?;

    relay.process(upload).await
}

/// Pull the first `pdf` field out of a multipart body.
///
/// Returns `Ok(None)` when the field is missing or has no bytes. Other fields
/// are skipped.
pub async fn read_pdf_field(mut multipart: Multipart) -> Result<Option<PdfUpload>, RelayError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RelayError::Unexpected(e.body_text()))?
    {
        if field.name() != Some(PDF_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_owned);
        let data = field
            .bytes()
            .await
            .map_err(|e| RelayError::Unexpected(e.body_text()))?
            .to_vec();

        if data.is_empty() {
            return Ok(None);
        }
        return Ok(Some(PdfUpload::new(filename, data)));
    }
    Ok(None)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting graceful shutdown..."),
    }
}
