//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (audit with body limit, tracing, timeout, request ID)
//! - Serve on a bound listener until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, State},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::HttpConfig;
use crate::http::audit::{self, AuditState};
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response::{envelope, Envelope};
use crate::labels::{Label, DEFAULT_LABEL};
use crate::lifecycle::signals::shutdown_signal;
use crate::logging::Logger;
use crate::todo::{handlers, TodoStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: TodoStore,
    pub logger: Logger,
    pub labels: Arc<Vec<Label>>,
}

impl AppState {
    /// `logger` is re-scoped to the todo handlers' source file.
    pub fn new(store: TodoStore, logger: &Logger, labels: Vec<Label>) -> Self {
        Self {
            store,
            logger: logger.scoped(handlers::SOURCE),
            labels: Arc::new(labels),
        }
    }

    /// Label given to todos created without one: the first loaded label.
    pub fn default_label(&self) -> String {
        self.labels
            .first()
            .map(|label| label.name.clone())
            .unwrap_or_else(|| DEFAULT_LABEL.to_string())
    }
}

/// HTTP server for the todo service.
pub struct HttpServer {
    router: Router,
    logger: Logger,
}

impl HttpServer {
    pub fn new(config: &HttpConfig, state: AppState) -> Self {
        let logger = state.logger.scoped(file!());
        let audit = AuditState {
            logger: state.logger.scoped(audit::SOURCE),
            max_body_length: config.audit_body_length,
            max_body_size: config.max_body_size,
        };
        Self {
            router: Self::build_router(config, state, audit),
            logger,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &HttpConfig, state: AppState, audit: AuditState) -> Router {
        Router::new()
            .route("/hello", get(hello))
            .route("/labels", get(labels))
            .nest("/todo", handlers::router())
            .with_state(state)
            .layer(middleware::from_fn_with_state(audit, audit::audit_requests))
            // The audit middleware enforces `max_body_size` while buffering.
            .layer(DefaultBodyLimit::disable())
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs))),
            )
    }

    /// Run the server until Ctrl+C or a message on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        self.logger.info(format!("HTTP server listening on {addr}"));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        self.logger.info("HTTP server stopped");
        Ok(())
    }
}

async fn hello() -> Json<Value> {
    Json(json!({ "result": "Hello World!" }))
}

async fn labels(State(state): State<AppState>) -> Json<Envelope<Vec<Label>>> {
    envelope(state.labels.as_ref().clone())
}
