//! Request identification and body decoding.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) for every request
//! - Decode JSON bodies, mapping failures to 400 errors
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An incoming `x-request-id` is kept, not replaced
//! - An empty body decodes as `{}` so optional fields simply read as missing

use axum::body::Bytes;
use axum::http::{HeaderName, HeaderValue, Request};
use serde_json::{Map, Value};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::error::ApiError;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Issues a fresh UUID v4 per request.
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request id set by the request-id layer, if any.
pub fn request_id<B>(request: &Request<B>) -> Option<String> {
    request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Decode a JSON request body. Whitespace-only bodies decode as `{}`.
pub fn parse_json_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_uuids() {
        let request = Request::new(());
        let mut make = MakeRequestUuidV4;
        let id = make.make_request_id(&request).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
        let other = make.make_request_id(&request).unwrap();
        assert_ne!(id.header_value(), other.header_value());
    }

    #[test]
    fn test_parse_json_body() {
        assert_eq!(parse_json_body(&Bytes::new()).unwrap(), Value::Object(Map::new()));
        assert_eq!(
            parse_json_body(&Bytes::from_static(b"{\"message\":\"hi\"}")).unwrap()["message"],
            "hi"
        );
        assert!(matches!(
            parse_json_body(&Bytes::from_static(b"{oops")),
            Err(ApiError::BadRequest(_))
        ));
    }
}
