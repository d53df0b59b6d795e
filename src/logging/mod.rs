//! Structured logging subsystem.
//!
//! # Data Flow
//! ```text
//! Application code
//!     → Logger (level check, call-site tag, message rendering)
//!     → LogRecord
//!     → console.rs (colorized line → injected LineWriter)
//!     → file.rs   (JSON line → non-blocking worker → logs/<date>.log)
//!
//! tracing events (tower-http, sqlx, ...)
//!     → layer.rs (LoggerLayer) → Logger
//! ```
//!
//! # Usage
//! ```ignore
//! use todo_api::logging::{create_logger, LoggerOptions};
//!
//! let logger = create_logger(&LoggerOptions::default())?;
//! todo_api::log!(logger, "listening on {}", addr);
//! logger.print("plain output");
//! ```

pub mod console;
pub mod file;
pub mod layer;
pub mod level;
pub mod location;
pub mod logger;
pub mod record;
pub mod sink;
pub mod writer;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use console::ConsoleSink;
pub use file::{RollingFile, RotatingFileSink};
pub use layer::LoggerLayer;
pub use level::LogLevel;
pub use location::{frame_at, parse_stack_line, StackParseError};
pub use logger::Logger;
pub use record::{LogRecord, Message, SourceLocation};
pub use sink::Sink;
pub use writer::{LineWriter, MemoryWriter, StdoutWriter};

/// Invalid logger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
}

/// Logger options as they appear in configuration files.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerOptions {
    /// Source file shown before each console message.
    pub file_name: String,

    /// One of error, warn, info, debug.
    pub log_level: String,

    /// Prefix console lines with a timestamp.
    pub log_timestamp: bool,

    /// Also write JSON lines into the rotating file sink.
    pub log_to_file: bool,

    /// Directory of the rotating file sink.
    pub log_directory: PathBuf,

    /// Color console output.
    pub colorize: bool,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            file_name: String::new(),
            log_level: "info".to_string(),
            log_timestamp: false,
            log_to_file: false,
            log_directory: PathBuf::from("logs"),
            colorize: true,
        }
    }
}

/// Validated logger configuration.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub file_name: Option<String>,
    pub level: LogLevel,
    pub timestamps: bool,
    pub log_to_file: bool,
    pub directory: PathBuf,
    pub colorize: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            file_name: None,
            level: LogLevel::Info,
            timestamps: false,
            log_to_file: false,
            directory: PathBuf::from("logs"),
            colorize: true,
        }
    }
}

impl TryFrom<&LoggerOptions> for LoggerConfig {
    type Error = ConfigError;

    fn try_from(options: &LoggerOptions) -> Result<Self, Self::Error> {
        Ok(Self {
            file_name: normalize_file_name(&options.file_name),
            level: options.log_level.parse()?,
            timestamps: options.log_timestamp,
            log_to_file: options.log_to_file,
            directory: options.log_directory.clone(),
            colorize: options.colorize,
        })
    }
}

/// Build a logger from configuration options.
pub fn create_logger(options: &LoggerOptions) -> Result<Logger, ConfigError> {
    Ok(Logger::new(LoggerConfig::try_from(options)?))
}

/// Empty names become `None`; absolute paths are made relative to the
/// working directory.
pub(crate) fn normalize_file_name(file_name: &str) -> Option<String> {
    if file_name.is_empty() {
        return None;
    }
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| {
            std::path::Path::new(file_name)
                .strip_prefix(&cwd)
                .ok()
                .map(|p| p.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| file_name.to_string());
    Some(relative)
}

/// Info with the enclosing function's name in the tag.
#[macro_export]
macro_rules! log {
    ($logger:expr, $fmt:literal) => {
        $crate::log!($logger, format!($fmt))
    };
    ($logger:expr, $message:expr) => {
        $logger.info_at(
            $message,
            $crate::logging::SourceLocation::here($crate::__function_path!(), file!(), line!(), column!()),
        )
    };
    ($logger:expr, $fmt:literal, $($arg:tt)+) => {
        $crate::log!($logger, format!($fmt, $($arg)+))
    };
}

/// Debug with the enclosing function's name in the tag.
#[macro_export]
macro_rules! deb {
    ($logger:expr, $fmt:literal) => {
        $crate::deb!($logger, format!($fmt))
    };
    ($logger:expr, $message:expr) => {
        $logger.debug_at(
            $message,
            $crate::logging::SourceLocation::here($crate::__function_path!(), file!(), line!(), column!()),
        )
    };
    ($logger:expr, $fmt:literal, $($arg:tt)+) => {
        $crate::deb!($logger, format!($fmt, $($arg)+))
    };
}

/// Info a serializable value as pretty JSON.
#[macro_export]
macro_rules! lj {
    ($logger:expr, $value:expr) => {
        $crate::log!($logger, $crate::logging::Message::structured(&$value))
    };
}

/// Debug a serializable value as pretty JSON.
#[macro_export]
macro_rules! dj {
    ($logger:expr, $value:expr) => {
        $crate::deb!($logger, $crate::logging::Message::structured(&$value))
    };
}
