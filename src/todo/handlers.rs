//! `/todo` route handlers.
//!
//! Every handler is a straight validate, store call, respond round trip.
//! Failures become [`ApiError`]s and are rendered as the JSON envelope.

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::request::parse_json_body;
use crate::http::response::{envelope, Envelope};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::todo::model::{NewTodo, Todo};
use crate::utils::is_numeric_string;
use crate::{deb, log};

/// Source path used to scope the handlers' logger.
pub const SOURCE: &str = file!();

const MESSAGE_REQUIRED: &str = "Message is required and must be a string.";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/all", get(retrieve_all))
        .route("/{id}", get(retrieve))
        .route("/{id}/update", put(update))
        .route("/{id}/delete", delete(remove))
}

async fn create(State(state): State<AppState>, body: Bytes) -> Result<Json<Envelope<Todo>>, ApiError> {
    let body = parse_json_body(&body)?;
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::BadRequest(MESSAGE_REQUIRED.to_string()))?;
    let label = body
        .get("label")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| state.default_label());

    let todo = state.store.create(NewTodo::new(message, label)).await?;
    metrics::record_todo_operation("create");
    log!(state.logger, "Created todo item: {}", to_json(&todo));
    Ok(envelope(todo))
}

async fn retrieve_all(State(state): State<AppState>) -> Result<Json<Envelope<Vec<Todo>>>, ApiError> {
    let todos = state.store.find_all().await?;
    metrics::record_todo_operation("list");
    deb!(state.logger, "Retrieved all {} todo items.", todos.len());
    Ok(envelope(todos))
}

async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let todo = find(&state, &id).await?;
    metrics::record_todo_operation("retrieve");
    log!(state.logger, "Retrieved todo item: {}", to_json(&todo));
    Ok(envelope(todo))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let todo = find(&state, &id).await?;
    let body = parse_json_body(&body)?;

    // Falsy messages ("", 0, false, null) leave the todo untouched.
    let message = match body.get("message") {
        Some(value) if is_truthy(value) => Some(
            value
                .as_str()
                .ok_or_else(|| ApiError::BadRequest(MESSAGE_REQUIRED.to_string()))?,
        ),
        _ => None,
    };

    let todo = state
        .store
        .update(todo.id, message)
        .await?
        .ok_or_else(|| not_found(&id))?;
    metrics::record_todo_operation("update");
    log!(state.logger, "Updated todo item: {}", to_json(&todo));
    Ok(envelope(todo))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let todo = find(&state, &id).await?;
    let todo = state
        .store
        .destroy(todo.id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    metrics::record_todo_operation("delete");
    log!(state.logger, "Deleted todo item: {}", to_json(&todo));
    Ok(envelope(todo))
}

async fn find(state: &AppState, raw_id: &str) -> Result<Todo, ApiError> {
    let id = parse_id(raw_id)?;
    state
        .store
        .find_by_pk(id)
        .await?
        .ok_or_else(|| not_found(raw_id))
}

/// Accept any numeric string with an integral value ("7", " 7 ", "7.0").
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    let invalid = || ApiError::BadRequest(format!("Invalid ID: {raw}"));
    if !is_numeric_string(raw) {
        return Err(invalid());
    }
    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if value.fract() != 0.0 || value < i64::MIN as f64 || value > i64::MAX as f64 {
        return Err(invalid());
    }
    Ok(value as i64)
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Todo with ID={id} not found"))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn to_json(todo: &Todo) -> String {
    serde_json::to_string(todo).unwrap_or_default()
}
