//! Console sink.
//!
//! # Format
//! ```text
//! [<YYYY-MM-DD HH:mm:ss.SSS> ]<level padded to 8>: [<file name> ]<message>
//! ```
//! Print-mode records skip all of the above: the message is written with ANSI
//! escapes stripped and leading whitespace trimmed.

use std::sync::Arc;

use console::{strip_ansi_codes, Style};

use super::level::LogLevel;
use super::record::LogRecord;
use super::sink::Sink;
use super::writer::LineWriter;
use super::LoggerConfig;

/// Width the level name is padded to.
pub const LEVEL_WIDTH: usize = 8;

/// Timestamp layout shared by the console and file sinks.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Human-readable, colorized output.
pub struct ConsoleSink {
    file_name: Option<String>,
    timestamps: bool,
    colorize: bool,
    out: Arc<dyn LineWriter>,
}

impl ConsoleSink {
    pub fn new(config: &LoggerConfig, out: Arc<dyn LineWriter>) -> Self {
        Self {
            file_name: config.file_name.clone(),
            timestamps: config.timestamps,
            colorize: config.colorize,
            out,
        }
    }

    /// Render a record into a single console line.
    pub fn render(&self, record: &LogRecord) -> String {
        let text = record.display_text();
        if record.message_only {
            return strip_ansi_codes(text).trim_start().to_string();
        }

        let level = record.level.as_str();
        let padding = " ".repeat(LEVEL_WIDTH.saturating_sub(level.len()));
        let mut line = String::new();
        if self.timestamps {
            line.push_str(&record.timestamp.format(TIMESTAMP_FORMAT).to_string());
            line.push(' ');
        }
        line.push_str(&self.paint(record.level, level));
        line.push_str(&padding);
        line.push_str(": ");
        if let Some(file_name) = &self.file_name {
            line.push_str(file_name);
            line.push(' ');
        }
        line.push_str(&self.paint(record.level, text));
        line
    }

    fn paint(&self, level: LogLevel, text: &str) -> String {
        if !self.colorize {
            return text.to_string();
        }
        level_style(level).apply_to(text).to_string()
    }
}

fn level_style(level: LogLevel) -> Style {
    let style = Style::new().force_styling(true);
    match level {
        LogLevel::Error => style.red(),
        LogLevel::Warn => style.yellow(),
        LogLevel::Info => style.green(),
        LogLevel::Debug => style.blue(),
    }
}

impl Sink for ConsoleSink {
    fn write(&self, record: &LogRecord) {
        // Nowhere left to report a failing console.
        let _ = self.out.write_line(&self.render(record));
    }
}
