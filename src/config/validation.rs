//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, pool sizes > 0)
//! - Validate addresses and URLs before anything binds or connects
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::AppConfig;
use crate::logging::LogLevel;

/// A single failed check, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.http.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "http.bind_address",
            format!("'{}' is not a socket address", config.http.bind_address),
        ));
    }
    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::new("http.request_timeout_secs", "must be > 0"));
    }
    if config.http.max_body_size == 0 {
        errors.push(ValidationError::new("http.max_body_size", "must be > 0"));
    }

    if config.database.url.is_empty() {
        errors.push(ValidationError::new("database.url", "must not be empty"));
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::new("database.max_connections", "must be > 0"));
    }

    if config.logging.log_level.parse::<LogLevel>().is_err() {
        errors.push(ValidationError::new(
            "logging.log_level",
            format!(
                "'{}' is not one of error, warn, info, debug",
                config.logging.log_level
            ),
        ));
    }

    if let Some(endpoint) = &config.labels.endpoint {
        if url::Url::parse(endpoint).is_err() {
            errors.push(ValidationError::new(
                "labels.endpoint",
                format!("'{endpoint}' is not a valid URL"),
            ));
        }
    }
    if config.labels.retries == 0 {
        errors.push(ValidationError::new("labels.retries", "must be > 0"));
    }
    if config.labels.timeout_secs == 0 {
        errors.push(ValidationError::new("labels.timeout_secs", "must be > 0"));
    }

    if config.metrics.enabled && config.metrics.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "metrics.address",
            format!("'{}' is not a socket address", config.metrics.address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
