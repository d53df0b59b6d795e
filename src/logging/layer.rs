//! Bridge from `tracing` events to a [`Logger`].
//!
//! Framework crates (tower-http, sqlx) report through `tracing`. Installing
//! [`LoggerLayer`] on a `tracing_subscriber` registry sends those events
//! through the same sinks as application log calls.

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use super::level::LogLevel;
use super::logger::Logger;
use super::record::SourceLocation;

pub struct LoggerLayer {
    logger: Logger,
}

impl LoggerLayer {
    /// Bridge into `logger`. Bridged lines carry no file-name prefix; the
    /// event target is used as the tag instead. The bridge follows the
    /// threshold of `logger`.
    pub fn new(logger: &Logger) -> Self {
        Self {
            logger: logger.scoped(""),
        }
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = LogLevel::from(*metadata.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let location = metadata.line().map(|line| SourceLocation {
            function_name: metadata.target().to_string(),
            file_path: metadata.file().unwrap_or_default().to_string(),
            line_number: line,
            column_number: 0,
        });
        self.logger.emit(level, visitor.finish(), location);
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<String>,
}

impl EventVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields.join(" "),
            (false, false) => format!("{} {}", self.message, self.fields.join(" ")),
        }
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}
