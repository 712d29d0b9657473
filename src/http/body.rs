//! Request body decoding stage.
//!
//! Buffers and decodes JSON and form-encoded bodies up to a fixed ceiling,
//! then restores the buffered bytes so downstream extractors still work.
//! Other content types pass through untouched.

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{Request, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::http::server::AppState;

/// Decoded request body, attached as a request extension.
#[derive(Debug, Clone)]
pub enum DecodedBody {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

enum BodyKind {
    Json,
    Form,
}

/// Middleware stage: decode JSON / form bodies, size-capped.
pub async fn decode_body(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(kind) = body_kind(&request) else {
        return next.run(request).await;
    };

    let limit = state.config.body.max_bytes;

    // Reject on the declared length before reading anything.
    if let Some(length) = content_length(&request) {
        if length > limit as u64 {
            return state
                .errors
                .respond(&ApiError::PayloadTooLarge { limit_bytes: limit });
        }
    }

    let (mut parts, body) = request.into_parts();
    let bytes = match to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        // Reading past the cap is the only local failure mode here; a client
        // that aborted mid-stream never sees the response anyway.
        Err(_) => {
            return state
                .errors
                .respond(&ApiError::PayloadTooLarge { limit_bytes: limit });
        }
    };

    if !bytes.is_empty() {
        match decode(kind, &bytes) {
            Ok(decoded) => {
                parts.extensions.insert(decoded);
            }
            Err(error) => return state.errors.respond(&error),
        }
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn body_kind(request: &Request) -> Option<BodyKind> {
    let content_type = request.headers().get(CONTENT_TYPE)?.to_str().ok()?;
    let mime = content_type.split(';').next()?.trim();
    if mime.eq_ignore_ascii_case("application/json") {
        Some(BodyKind::Json)
    } else if mime.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
        Some(BodyKind::Form)
    } else {
        None
    }
}

fn content_length(request: &Request) -> Option<u64> {
    request
        .headers()
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

fn decode(kind: BodyKind, bytes: &Bytes) -> Result<DecodedBody, ApiError> {
    match kind {
        BodyKind::Json => serde_json::from_slice(bytes)
            .map(DecodedBody::Json)
            .map_err(|e| ApiError::MalformedBody(e.to_string())),
        BodyKind::Form => Ok(DecodedBody::Form(
            url::form_urlencoded::parse(bytes).into_owned().collect(),
        )),
    }
}
