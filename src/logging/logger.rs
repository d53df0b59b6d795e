//! The structured logger.
//!
//! # Responsibilities
//! - Hold the active threshold and the sink list
//! - Attach call-site tags to leveled messages
//! - Provide the print mode for plain, human-facing output
//!
//! # Design Decisions
//! - Records below the threshold are dropped before any formatting
//! - The threshold is a single atomic shared by every sink of a logger and
//!   by every logger derived from it
//! - Loggers are cheap to clone; `scoped` derives a per-module logger that
//!   shares the threshold and the file sink

use std::fmt::Display;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use serde::Serialize;

use super::console::ConsoleSink;
use super::file::RotatingFileSink;
use super::level::LogLevel;
use super::location;
use super::record::{LogRecord, Message, SourceLocation};
use super::sink::Sink;
use super::writer::{LineWriter, StdoutWriter};
use super::{normalize_file_name, ConfigError, LoggerConfig};

/// Leveled logger with console and optional rotating file output.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

struct Inner {
    config: LoggerConfig,
    threshold: Arc<AtomicU8>,
    sinks: Vec<Arc<dyn Sink>>,
    console_out: Arc<dyn LineWriter>,
    file: Option<Arc<RotatingFileSink>>,
}

impl Logger {
    /// Build a logger writing its console output to stdout.
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_writer(config, Arc::new(StdoutWriter))
    }

    /// Build a logger writing its console output to `out`.
    pub fn with_writer(config: LoggerConfig, out: Arc<dyn LineWriter>) -> Self {
        let file = config
            .log_to_file
            .then(|| Arc::new(RotatingFileSink::new(config.directory.clone(), out.clone())));
        let threshold = Arc::new(AtomicU8::new(config.level.severity()));
        Self::assemble(config, threshold, out, file)
    }

    fn assemble(
        config: LoggerConfig,
        threshold: Arc<AtomicU8>,
        console_out: Arc<dyn LineWriter>,
        file: Option<Arc<RotatingFileSink>>,
    ) -> Self {
        let mut sinks: Vec<Arc<dyn Sink>> =
            vec![Arc::new(ConsoleSink::new(&config, console_out.clone()))];
        if let Some(file) = &file {
            sinks.push(file.clone());
        }
        Self {
            inner: Arc::new(Inner {
                threshold,
                config,
                sinks,
                console_out,
                file,
            }),
        }
    }

    /// Derive a logger for another source file. It shares this logger's
    /// threshold, console writer and file sink, so `set_level` on either
    /// one applies to both.
    pub fn scoped(&self, file_name: &str) -> Logger {
        let mut config = self.inner.config.clone();
        config.file_name = normalize_file_name(file_name);
        Self::assemble(
            config,
            self.inner.threshold.clone(),
            self.inner.console_out.clone(),
            self.inner.file.clone(),
        )
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.inner.config
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_severity(self.inner.threshold.load(Ordering::Relaxed))
    }

    /// Change the threshold from a level name.
    pub fn set_level(&self, level: &str) -> Result<(), ConfigError> {
        let level: LogLevel = level.parse()?;
        self.set_log_level(level);
        Ok(())
    }

    pub fn set_log_level(&self, level: LogLevel) {
        self.inner.threshold.store(level.severity(), Ordering::Relaxed);
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.level().admits(level)
    }

    // --- Leveled entry points ---

    #[track_caller]
    pub fn debug(&self, message: impl Into<Message>) {
        self.debug_at(message, SourceLocation::caller());
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<Message>) {
        self.info_at(message, SourceLocation::caller());
    }

    pub fn debug_at(&self, message: impl Into<Message>, location: SourceLocation) {
        self.tagged(LogLevel::Debug, message.into(), Some(location));
    }

    pub fn info_at(&self, message: impl Into<Message>, location: SourceLocation) {
        self.tagged(LogLevel::Info, message.into(), Some(location));
    }

    /// Debug with the tag taken from a rendered stack trace at `depth`.
    /// An unparseable trace omits the tag.
    pub fn debug_from_trace(&self, message: impl Into<Message>, trace: &str, depth: usize) {
        self.tagged(LogLevel::Debug, message.into(), location::frame_at(trace, depth).ok());
    }

    /// Info with the tag taken from a rendered stack trace at `depth`.
    pub fn info_from_trace(&self, message: impl Into<Message>, trace: &str, depth: usize) {
        self.tagged(LogLevel::Info, message.into(), location::frame_at(trace, depth).ok());
    }

    pub fn warn(&self, message: impl Into<Message>) {
        self.untagged(LogLevel::Warn, message.into());
    }

    pub fn error(&self, message: impl Into<Message>) {
        self.untagged(LogLevel::Error, message.into());
    }

    // --- Aliases ---

    #[track_caller]
    pub fn deb(&self, message: impl Into<Message>) {
        self.debug(message);
    }

    #[track_caller]
    pub fn log(&self, message: impl Into<Message>) {
        self.info(message);
    }

    /// Debug a value as pretty JSON.
    #[track_caller]
    pub fn dj<T: Serialize + ?Sized>(&self, value: &T) {
        self.deb(Message::structured(value));
    }

    /// Info a value as pretty JSON.
    #[track_caller]
    pub fn lj<T: Serialize + ?Sized>(&self, value: &T) {
        self.log(Message::structured(value));
    }

    // --- Print mode ---

    /// Plain output at info level. When the threshold hides info records,
    /// the text still reaches the console.
    pub fn print(&self, message: impl Into<Message>) {
        let text = message.into().render(true);
        if self.enabled(LogLevel::Info) {
            self.dispatch(&LogRecord::new(LogLevel::Info, text.clone()).message_only());
        }
        if matches!(self.level(), LogLevel::Warn | LogLevel::Error) {
            let _ = self.inner.console_out.write_line(&text);
        }
    }

    /// Print several values; more than one are joined with `,`.
    pub fn print_args<I, T>(&self, args: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let parts: Vec<String> = args.into_iter().map(|arg| arg.to_string()).collect();
        self.print(parts.join(","));
    }

    // --- Emission ---

    fn tagged(&self, level: LogLevel, message: Message, location: Option<SourceLocation>) {
        if !self.enabled(level) {
            return;
        }
        let text = message.render(true);
        let text = match &location {
            Some(location) => format!("{} {}", location.tag(), text),
            None => text,
        };
        self.dispatch(&LogRecord::new(level, text).with_location(location));
    }

    fn untagged(&self, level: LogLevel, message: Message) {
        if !self.enabled(level) {
            return;
        }
        let stack = message.stack().map(str::to_string);
        let record = LogRecord::new(level, message.render(false)).with_stack(stack);
        self.dispatch(&record);
    }

    /// Emit a record built elsewhere (e.g. from a `tracing` event).
    /// Debug and info records get the location tag like leveled calls do.
    pub(crate) fn emit(&self, level: LogLevel, message: String, location: Option<SourceLocation>) {
        match level {
            LogLevel::Debug | LogLevel::Info => self.tagged(level, Message::Text(message), location),
            LogLevel::Warn | LogLevel::Error => self.untagged(level, Message::Text(message)),
        }
    }

    fn dispatch(&self, record: &LogRecord) {
        for sink in &self.inner.sinks {
            sink.write(record);
        }
    }
}
