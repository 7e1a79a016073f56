//! Stack trace locator.
//!
//! Pulls the source position of a failure out of a Java-style stack trace.
//! The first frame of the form `at <method>(<file>:<line>)` wins; frames
//! without a `file:line` reference such as `(Native Method)` or
//! `(Unknown Source)` are skipped.

use crate::domain::models::FailureLocation;

/// Extract the failure location from `trace`.
///
/// Returns `None` when no line yields a usable frame, including for empty
/// traces and the "No stack trace available" placeholder.
pub fn locate(trace: &str) -> Option<FailureLocation> {
    trace.lines().find_map(parse_frame)
}

/// Parse one trace line. `None` for anything that is not a usable frame.
fn parse_frame(line: &str) -> Option<FailureLocation> {
    if !(line.contains("at ") && line.contains('(') && line.contains(')')) {
        return None;
    }

    let (_, after_marker) = line.split_once("at ")?;
    let method = after_marker.split('(').next()?.trim();

    let (_, after_paren) = line.split_once('(')?;
    let (reference, _) = after_paren.split_once(')')?;

    let mut parts = reference.split(':');
    let file = parts.next()?;
    let line_number = parts.next()?;

    Some(FailureLocation {
        file: file.to_string(),
        line: line_number.to_string(),
        method: method.to_string(),
        full_stack_line: line.trim().to_string(),
    })
}
