//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::logging::LoggerOptions;

/// Root configuration for the todo service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener and request handling.
    pub http: HttpConfig,

    /// Relational datastore settings.
    pub database: DatabaseConfig,

    /// Logger settings.
    pub logging: LoggerOptions,

    /// Remote label service.
    pub labels: LabelsConfig,

    /// Metrics exporter.
    pub metrics: MetricsConfig,
}

/// HTTP configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address (e.g., "0.0.0.0:9000").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Characters of request/response body kept in audit records.
    pub audit_body_length: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9000".to_string(),
            request_timeout_secs: 30,
            max_body_size: 1024 * 1024,
            audit_body_length: 50,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL (e.g., "sqlite://todos.db", "sqlite::memory:").
    pub url: String,

    /// Maximum pooled connections. In-memory databases always use one.
    pub max_connections: u32,

    /// Time allowed to acquire a connection, in milliseconds.
    pub connect_timeout_ms: u64,

    /// Drop and recreate the schema at startup (wipes all data).
    pub reset_on_start: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
            connect_timeout_ms: 15_000,
            reset_on_start: true,
        }
    }
}

/// Label service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelsConfig {
    /// Endpoint returning a JSON array of labels. Labels are skipped when unset.
    pub endpoint: Option<String>,

    /// Fetch attempts before falling back to the placeholder label.
    pub retries: u32,

    /// Delay between attempts in milliseconds.
    pub retry_delay_ms: u64,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            retries: 3,
            retry_delay_ms: 1000,
            timeout_secs: 10,
        }
    }
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Serve a Prometheus scrape endpoint.
    pub enabled: bool,

    /// Scrape endpoint bind address.
    pub address: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "0.0.0.0:9091".to_string(),
        }
    }
}
