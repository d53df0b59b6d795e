//! Call-site extraction from rendered stack traces.
//!
//! Leveled calls inside this crate capture their location at compile time
//! (`#[track_caller]` and the logging macros). This module covers the other
//! case: a caller that only holds a printed trace, in the
//! `at <function> (<path>:<line>:<col>)` frame format.
//!
//! Frame depth counts from the first frame after the header line. A direct
//! call site sits at [`DIRECT_DEPTH`]; each wrapper the trace passed through
//! adds one.

use thiserror::Error;

use super::record::SourceLocation;

/// Frame index of the caller for a trace captured one layer below it.
pub const DIRECT_DEPTH: usize = 2;
/// Frame index when the trace passed through one wrapper.
pub const WRAPPER_DEPTH: usize = 3;
/// Frame index when the trace passed through a JSON wrapper and a wrapper.
pub const JSON_WRAPPER_DEPTH: usize = 4;

/// A stack frame that does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackParseError {
    #[error("stack trace has no frames")]
    NoFrames,
    #[error("malformed stack frame: {0:?}")]
    MalformedFrame(String),
    #[error("malformed frame location: {0:?}")]
    MalformedLocation(String),
}

/// Parse one frame line such as `at foo (/app/lib/logging.ts:33:19)`.
pub fn parse_stack_line(line: &str) -> Result<SourceLocation, StackParseError> {
    let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
    let sections: Vec<&str> = collapsed.split(' ').collect();
    if sections.len() < 3 {
        return Err(StackParseError::MalformedFrame(line.to_string()));
    }
    let function_name = sections[1];
    let location = strip_parens(sections[2]);

    let items: Vec<&str> = location.split(':').collect();
    if items.len() < 3 {
        return Err(StackParseError::MalformedLocation(location.to_string()));
    }
    let (path, position) = items.split_at(items.len() - 2);
    let line_number = position[0]
        .parse::<u32>()
        .map_err(|_| StackParseError::MalformedLocation(location.to_string()))?;
    let column_number = position[1]
        .parse::<u32>()
        .map_err(|_| StackParseError::MalformedLocation(location.to_string()))?;

    Ok(SourceLocation {
        function_name: function_name.to_string(),
        file_path: path.join(":"),
        line_number,
        column_number,
    })
}

/// Select the frame at `depth` (header line excluded) and parse it.
/// Depths past the end clamp to the last frame.
pub fn frame_at(stack: &str, depth: usize) -> Result<SourceLocation, StackParseError> {
    let frames: Vec<&str> = stack.lines().skip(1).collect();
    if frames.is_empty() {
        return Err(StackParseError::NoFrames);
    }
    let index = depth.min(frames.len() - 1);
    parse_stack_line(frames[index])
}

fn strip_parens(location: &str) -> &str {
    let location = location.strip_prefix('(').unwrap_or(location);
    location.strip_suffix(')').unwrap_or(location)
}

/// Expands to the path of the enclosing function.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        name.trim_end_matches("::{{closure}}")
    }};
}
