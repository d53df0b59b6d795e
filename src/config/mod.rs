//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, defaults for missing fields)
//!     → environment overrides (HTTP_PORT, DATABASE_URL, LOG_LEVEL, ...)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so the service starts with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use env::{get_env_var, get_env_vars, EnvVarError};
pub use loader::{apply_env_overrides, load_config, ConfigError};
pub use schema::{AppConfig, DatabaseConfig, HttpConfig, LabelsConfig, MetricsConfig};
pub use validation::{validate_config, ValidationError};
