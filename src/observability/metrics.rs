//! Metrics collection and exposition.
//!
//! # Metrics
//! - `todo_http_requests_total` (counter): requests by method, status
//! - `todo_http_request_duration_seconds` (histogram): latency by method
//! - `todo_operations_total` (counter): successful store operations by kind
//! - `todo_label_fetch_failures_total` (counter): failed label requests
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op, so tests and the
//!   CLI never need to set one up

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "todo_http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "todo_http_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_todo_operation(op: &'static str) {
    metrics::counter!("todo_operations_total", "op" => op).increment(1);
}

pub fn record_label_fetch_failure() {
    metrics::counter!("todo_label_fetch_failures_total").increment(1);
}
