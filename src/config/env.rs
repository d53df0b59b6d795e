//! Environment variable helpers.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvVarError {
    #[error("Environment variable {0} is not defined.")]
    Missing(String),
}

/// Read a required environment variable.
pub fn get_env_var(name: &str) -> Result<String, EnvVarError> {
    std::env::var(name).map_err(|_| EnvVarError::Missing(name.to_string()))
}

/// Read several required environment variables, failing on the first missing one.
pub fn get_env_vars(names: &[&str]) -> Result<HashMap<String, String>, EnvVarError> {
    names
        .iter()
        .map(|name| get_env_var(name).map(|value| (name.to_string(), value)))
        .collect()
}
