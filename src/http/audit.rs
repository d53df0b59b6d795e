//! Request audit middleware.
//!
//! # Responsibilities
//! - Log one structured info record per request: method, URL, request
//!   body, response status, elapsed time and response body
//! - Record request count and latency metrics
//!
//! # Design Decisions
//! - Headers are never logged
//! - Bodies are buffered and truncated to `audit_body_length` characters
//!   plus `...`; the full body is passed on untouched

use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::http::error::ApiError;
use crate::http::request::request_id;
use crate::logging::Logger;
use crate::observability::metrics;

/// Source path used to scope the audit logger.
pub const SOURCE: &str = file!();

#[derive(Clone)]
pub struct AuditState {
    pub logger: Logger,
    pub max_body_length: usize,
    pub max_body_size: usize,
}

pub async fn audit_requests(
    State(state): State<AuditState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let url = request.uri().to_string();
    let id = request_id(&request);

    let (parts, body) = request.into_parts();
    let request_body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(_) => {
            let response = ApiError::PayloadTooLarge(format!(
                "Request body exceeds {} bytes",
                state.max_body_size
            ))
            .into_response();
            metrics::record_request(&method, response.status().as_u16(), start);
            return response;
        }
    };
    let request_text = truncate_body(&request_body, state.max_body_length);

    let response = next
        .run(Request::from_parts(parts, Body::from(request_body)))
        .await;

    let (parts, body) = response.into_parts();
    let response_body = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_else(|_| Bytes::new());
    let status = parts.status.as_u16();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    metrics::record_request(&method, status, start);
    crate::lj!(
        state.logger,
        json!({
            "requestId": id,
            "request": {
                "method": method,
                "url": url,
                "body": request_text,
            },
            "response": {
                "status": status,
                "elapsed": elapsed_ms,
                "body": truncate_body(&response_body, state.max_body_length),
            },
        })
    );

    Response::from_parts(parts, Body::from(response_body))
}

/// Lossy UTF-8 text of `body`, cut to `max` characters plus `...`.
pub fn truncate_body(body: &[u8], max: usize) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body(b"short", 50), "short");
        assert_eq!(truncate_body(&[b'a'; 50], 50), "a".repeat(50));

        let long = "b".repeat(51);
        assert_eq!(truncate_body(long.as_bytes(), 50), format!("{}...", "b".repeat(50)));
    }

    #[test]
    fn test_truncate_counts_characters() {
        let text = "é".repeat(60);
        let cut = truncate_body(text.as_bytes(), 50);
        assert_eq!(cut.chars().count(), 53);
        assert!(cut.ends_with("..."));
    }
}
