//! Uniform JSON response envelopes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

/// Error envelope shared by every failure path.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,

    /// Present only on route-not-found responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Build an error response with the uniform envelope.
pub fn error_response(status: StatusCode, message: &str, path: Option<String>) -> Response {
    let body = ErrorBody {
        success: false,
        error: message.to_string(),
        path,
    };
    (status, Json(body)).into_response()
}
