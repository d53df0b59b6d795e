//! Log messages and records.
//!
//! # Responsibilities
//! - Represent what callers hand to the logger (`Message`)
//! - Represent what sinks receive (`LogRecord`)
//!
//! # Design Decisions
//! - Non-text values are kept as JSON and pretty-printed with a two-space indent
//! - Error-like messages carry a rendered stack built from the `source()` chain

use std::error::Error as StdError;
use std::panic::Location;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use super::level::LogLevel;

/// A message passed to the logger.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Already-formed text, emitted as is.
    Text(String),
    /// A structured value, rendered as JSON.
    Structured(serde_json::Value),
    /// An error; sinks prefer the stack over the message.
    Error { message: String, stack: String },
}

impl Message {
    /// Serialize any value into a structured message.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Message::Structured(value),
            Err(e) => Message::Text(format!("<unserializable value: {e}>")),
        }
    }

    /// Build an error message, walking the `source()` chain into the stack.
    pub fn from_error<E: StdError + ?Sized>(err: &E) -> Self {
        let message = err.to_string();
        let mut stack = format!("Error: {message}");
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }
        Message::Error { message, stack }
    }

    /// Prefix the message text (and stack, for errors) with some context.
    pub fn context(self, context: &str) -> Self {
        match self {
            Message::Text(text) => Message::Text(format!("{context} {text}")),
            Message::Structured(value) => {
                Message::Text(format!("{context} {}", render_json(&value, true)))
            }
            Message::Error { message, stack } => Message::Error {
                message: format!("{context} {message}"),
                stack: format!("{context} {stack}"),
            },
        }
    }

    /// Render the message text. Structured values are pretty-printed when `pretty`.
    pub fn render(&self, pretty: bool) -> String {
        match self {
            Message::Text(text) => text.clone(),
            Message::Structured(value) => render_json(value, pretty),
            Message::Error { message, .. } => message.clone(),
        }
    }

    pub fn stack(&self) -> Option<&str> {
        match self {
            Message::Error { stack, .. } => Some(stack),
            _ => None,
        }
    }
}

fn render_json(value: &serde_json::Value, pretty: bool) -> String {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.unwrap_or_else(|e| format!("<unserializable value: {e}>"))
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<&String> for Message {
    fn from(text: &String) -> Self {
        Message::Text(text.clone())
    }
}

impl From<serde_json::Value> for Message {
    fn from(value: serde_json::Value) -> Self {
        Message::Structured(value)
    }
}

/// Where a log call originated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub function_name: String,
    pub file_path: String,
    pub line_number: u32,
    pub column_number: u32,
}

impl SourceLocation {
    /// Build a location from compile-time tokens. Only the last path segment
    /// of `function_path` is kept.
    pub fn here(function_path: &str, file: &str, line: u32, column: u32) -> Self {
        let function_name = function_path.rsplit("::").next().unwrap_or(function_path);
        Self {
            function_name: function_name.to_string(),
            file_path: file.to_string(),
            line_number: line,
            column_number: column,
        }
    }

    /// Location of the nearest caller not marked `#[track_caller]`.
    ///
    /// `Location` carries no function name, so the file stem stands in for it.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }

    /// The `[<function> : <line>]` tag prepended to leveled messages.
    pub fn tag(&self) -> String {
        format!("[{} : {}]", self.function_name, self.line_number)
    }
}

impl From<&Location<'_>> for SourceLocation {
    fn from(location: &Location<'_>) -> Self {
        let file = location.file();
        let stem = Path::new(file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file);
        Self {
            function_name: stem.to_string(),
            file_path: file.to_string(),
            line_number: location.line(),
            column_number: location.column(),
        }
    }
}

/// A single log event as delivered to sinks.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub stack: Option<String>,
    pub timestamp: DateTime<Local>,
    pub location: Option<SourceLocation>,
    pub message_only: bool,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            stack: None,
            timestamp: Local::now(),
            location: None,
            message_only: false,
        }
    }

    pub fn with_stack(mut self, stack: Option<String>) -> Self {
        self.stack = stack;
        self
    }

    pub fn with_location(mut self, location: Option<SourceLocation>) -> Self {
        self.location = location;
        self
    }

    pub fn message_only(mut self) -> Self {
        self.message_only = true;
        self
    }

    /// The text a human-facing sink should show: the stack when there is one.
    pub fn display_text(&self) -> &str {
        self.stack.as_deref().unwrap_or(&self.message)
    }
}
