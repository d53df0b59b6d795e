//! Rotating JSON-lines file sink.
//!
//! # Responsibilities
//! - Encode records as one JSON object per line
//! - Write into `<dir>/<YYYY-MM-DD>.log`, opening a new file when the date changes
//! - Cap each file at [`MAX_FILE_BYTES`]; overflow goes to `<date>.log.1`, `.2`, ...
//! - Remove files dated more than [`RETENTION_DAYS`] days back
//!
//! # Design Decisions
//! - Lines are handed to a `tracing-appender` non-blocking worker; callers never
//!   wait on disk I/O and the worker serializes writes, so lines never interleave
//! - Every record is a single write, so rotation never splits a line
//! - I/O failures are reported to the console writer and swallowed

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate, TimeDelta};
use serde::Serialize;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

use super::console::TIMESTAMP_FORMAT;
use super::record::LogRecord;
use super::sink::Sink;
use super::writer::LineWriter;

/// Largest size a single log file may reach (20 MB).
pub const MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;

/// Days of log files kept on disk.
pub const RETENTION_DAYS: i64 = 30;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Serialize)]
struct FileEntry<'a> {
    level: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<&'a str>,
    timestamp: String,
    #[serde(rename = "messageOnly", skip_serializing_if = "is_false")]
    message_only: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Encode a record as a single JSON line (without the trailing newline).
pub fn encode_record(record: &LogRecord) -> String {
    let entry = FileEntry {
        level: record.level.as_str(),
        message: &record.message,
        stack: record.stack.as_deref(),
        timestamp: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        message_only: record.message_only,
    };
    serde_json::to_string(&entry).unwrap_or_else(|e| {
        format!(
            "{{\"level\":\"error\",\"message\":\"unencodable log record: {}\"}}",
            e.to_string().replace('"', "'")
        )
    })
}

struct OpenFile {
    date: NaiveDate,
    index: u32,
    file: File,
    size: u64,
}

/// Date- and size-rotated append-only file.
pub struct RollingFile {
    dir: PathBuf,
    max_bytes: u64,
    retention: TimeDelta,
    current: Option<OpenFile>,
    report: Arc<dyn LineWriter>,
}

impl RollingFile {
    pub fn new(dir: impl Into<PathBuf>, report: Arc<dyn LineWriter>) -> Self {
        Self {
            dir: dir.into(),
            max_bytes: MAX_FILE_BYTES,
            retention: TimeDelta::days(RETENTION_DAYS),
            current: None,
            report,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes.max(1);
        self
    }

    /// Path of the file for `date`; `index` 0 is the primary file.
    pub fn path_for(&self, date: NaiveDate, index: u32) -> PathBuf {
        let name = if index == 0 {
            format!("{}.log", date.format(DATE_FORMAT))
        } else {
            format!("{}.log.{}", date.format(DATE_FORMAT), index)
        };
        self.dir.join(name)
    }

    /// Append `buf` to the file for `today`, rotating first if needed.
    pub fn append(&mut self, buf: &[u8], today: NaiveDate) -> io::Result<()> {
        let len = buf.len() as u64;
        let rotate = match &self.current {
            None => true,
            Some(open) => open.date != today || (open.size > 0 && open.size + len > self.max_bytes),
        };
        if rotate {
            self.open(today, len)?;
        }
        match self.current.as_mut() {
            Some(open) => {
                open.file.write_all(buf)?;
                open.size += len;
                Ok(())
            }
            None => Err(io::Error::new(io::ErrorKind::NotFound, "no log file open")),
        }
    }

    fn open(&mut self, today: NaiveDate, incoming: u64) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut index = match &self.current {
            Some(open) if open.date == today => open.index + 1,
            _ => 0,
        };
        loop {
            let path = self.path_for(today, index);
            let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            if size == 0 || size + incoming <= self.max_bytes {
                let file = OpenOptions::new().create(true).append(true).open(&path)?;
                self.current = Some(OpenFile { date: today, index, file, size });
                break;
            }
            index += 1;
        }
        self.prune(today);
        Ok(())
    }

    /// Delete log files dated before the retention window.
    fn prune(&self, today: NaiveDate) {
        let cutoff = today - self.retention;
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.report_error(&self.dir, &e);
                return;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(date) = log_file_date(&path) else {
                continue;
            };
            if date < cutoff {
                if let Err(e) = fs::remove_file(&path) {
                    self.report_error(&path, &e);
                }
            }
        }
    }

    fn report_error(&self, path: &Path, err: &io::Error) {
        let _ = self
            .report
            .write_line(&format!("error   : log file sink failed at {}: {}", path.display(), err));
    }
}

/// Date encoded in a `<YYYY-MM-DD>.log[.N]` file name.
fn log_file_date(path: &Path) -> Option<NaiveDate> {
    let name = path.file_name()?.to_str()?;
    let (date, rest) = name.split_at_checked(10)?;
    if !rest.starts_with(".log") {
        return None;
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Err(e) = self.append(buf, Local::now().date_naive()) {
            self.report_error(&self.dir, &e);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.current.as_mut() {
            Some(open) => open.file.flush(),
            None => Ok(()),
        }
    }
}

/// Sink writing JSON lines through a background worker.
///
/// Pending lines are flushed when the sink is dropped.
pub struct RotatingFileSink {
    writer: NonBlocking,
    _guard: WorkerGuard,
}

impl RotatingFileSink {
    pub fn new(dir: impl Into<PathBuf>, report: Arc<dyn LineWriter>) -> Self {
        Self::from_file(RollingFile::new(dir, report))
    }

    pub fn from_file(file: RollingFile) -> Self {
        let (writer, guard) = tracing_appender::non_blocking(file);
        Self {
            writer,
            _guard: guard,
        }
    }
}

impl Sink for RotatingFileSink {
    fn write(&self, record: &LogRecord) {
        let mut line = encode_record(record);
        line.push('\n');
        let mut writer = self.writer.clone();
        let _ = writer.write_all(line.as_bytes());
    }
}
