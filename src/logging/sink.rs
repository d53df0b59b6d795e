//! Sink abstraction.

use super::record::LogRecord;

/// An output a logger fans records out to.
///
/// Level filtering happens in the logger before a record is built, so sinks
/// render whatever they receive. Implementations must not propagate I/O
/// failures to the caller.
pub trait Sink: Send + Sync {
    fn write(&self, record: &LogRecord);
}
