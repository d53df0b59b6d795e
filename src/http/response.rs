//! Success envelope.
//!
//! Successful responses are `{ "error": null, "result": ... }`; errors are
//! rendered by [`ApiError`](crate::http::error::ApiError) as
//! `{ "error": "<message>" }`.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub error: Option<String>,
    pub result: T,
}

pub fn envelope<T: Serialize>(result: T) -> Json<Envelope<T>> {
    Json(Envelope {
        error: None,
        result,
    })
}
