//! JSON response envelope and the CORS header set.
//!
//! Every response the relay sends, success or failure, is a
//! [`ResponseEnvelope`] serialised as JSON and decorated with
//! [`CORS_HEADERS`]. Preflight responses carry the same headers with no body.

use crate::error::RelayError;
use axum::http::{header, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Headers attached to every response.
pub const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

/// `{ success, text?, message? }` — the only body shape the relay emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResponseEnvelope {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            message: Some(message.into()),
        }
    }

    /// Render with the given status, JSON content type and CORS headers.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, CORS_HEADERS, Json(self)).into_response()
    }
}

impl From<&RelayError> for ResponseEnvelope {
    fn from(e: &RelayError) -> Self {
        ResponseEnvelope::failure(e.message())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        ResponseEnvelope::from(&self).into_response_with(self.status())
    }
}

/// Empty 204 answer to a CORS preflight.
pub fn preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        CORS_HEADERS,
        [(header::CONTENT_TYPE, "application/json")],
    )
        .into_response()
}
