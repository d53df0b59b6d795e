//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::env::get_env_var;
use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {name}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |name| get_env_var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`. `lookup` is injected so
/// tests don't touch the process environment.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("HTTP_PORT") {
        let port: u16 = port.parse().map_err(|_| ConfigError::InvalidEnv {
            name: "HTTP_PORT",
            value: port.clone(),
        })?;
        let host = config
            .http
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.http.bind_address = format!("{host}:{port}");
    }
    if let Some(url) = lookup("DATABASE_URL") {
        config.database.url = url;
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        config.logging.log_level = level;
    }
    if let Some(value) = lookup("LOG_TO_FILE") {
        config.logging.log_to_file = parse_flag("LOG_TO_FILE", value)?;
    }
    if let Some(value) = lookup("LOG_TIMESTAMP") {
        config.logging.log_timestamp = parse_flag("LOG_TIMESTAMP", value)?;
    }
    if let Some(endpoint) = lookup("LABELS_ENDPOINT") {
        config.labels.endpoint = (!endpoint.is_empty()).then_some(endpoint);
    }
    if let Some(address) = lookup("METRICS_ADDRESS") {
        config.metrics.enabled = true;
        config.metrics.address = address;
    }
    Ok(())
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidEnv { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("HTTP_PORT", "8080"),
                ("DATABASE_URL", "sqlite://todos.db"),
                ("LOG_LEVEL", "debug"),
                ("LOG_TO_FILE", "true"),
                ("LABELS_ENDPOINT", "http://labels.local/labels"),
            ]),
        )
        .unwrap();

        assert_eq!(config.http.bind_address, "0.0.0.0:8080");
        assert_eq!(config.database.url, "sqlite://todos.db");
        assert_eq!(config.logging.log_level, "debug");
        assert!(config.logging.log_to_file);
        assert!(!config.logging.log_timestamp);
        assert_eq!(
            config.labels.endpoint.as_deref(),
            Some("http://labels.local/labels")
        );
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let mut config = AppConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("HTTP_PORT", "http")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value 'http' for HTTP_PORT");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[http]
bind_address = "127.0.0.1:7000"

[logging]
log_level = "warn"
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.http.request_timeout_secs, 30);
        if std::env::var("LOG_LEVEL").is_err() {
            assert_eq!(config.logging.log_level, "warn");
        }
    }

    #[test]
    fn test_invalid_file_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\nmax_connections = 0").unwrap();
        match load_config(Some(file.path())) {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.field == "database.max_connections"))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
