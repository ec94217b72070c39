//! Permissive parser from wire text to [`Frame`].
//!
//! `parse` never fails. It is not a protocol validator: anything it cannot
//! make sense of is kept in the best shape it can manage and the session
//! decides later whether the frame is worth dispatching.

use crate::codec::FRAME_TERMINATOR;
use crate::command::Command;
use crate::frame::{Frame, Headers};

/// Split off the first line of `input`.
///
/// Returns the line (without its LF and without a trailing CR) and the text
/// after the LF, or `None` when `input` holds no further line.
fn next_line(input: &str) -> (&str, Option<&str>) {
    let (line, rest) = match input.find('\n') {
        Some(i) => (&input[..i], Some(&input[i + 1..])),
        None => (input, None),
    };
    (line.strip_suffix('\r').unwrap_or(line), rest)
}

/// Split a header line on its first colon and trim both halves.
///
/// Only the first colon is significant: `content-type: text/plain; a=b:c`
/// keeps `text/plain; a=b:c` as its value. A line without any colon becomes
/// a header named after the whole (trimmed) line with an empty value.
pub fn parse_header_line(line: &str) -> (&str, &str) {
    match line.split_once(':') {
        Some((name, value)) => (name.trim(), value.trim()),
        None => (line.trim(), ""),
    }
}

/// Parse wire text into a frame.
///
/// - Anything from the first NUL onward is ignored, so a trailing frame
///   terminator is accepted.
/// - Line 0 (trimmed) is the command.
/// - Header lines follow until the first empty line. A repeated header name
///   keeps its first position and takes the last value.
/// - Everything after the empty line is the body, verbatim. The body is
///   absent when the line right after the empty line is itself empty (this
///   includes nothing following at all), or when no empty line exists. A
///   body that starts with a newline therefore does not survive a render
///   and parse.
pub fn parse(text: &str) -> Frame {
    let text = match text.find(FRAME_TERMINATOR) {
        Some(end) => &text[..end],
        None => text,
    };

    let (command_line, mut rest) = next_line(text);
    let command = Command::from(command_line.trim());

    let mut headers = Headers::new();
    let mut body = None;
    while let Some(remaining) = rest {
        let (line, next) = next_line(remaining);
        if line.is_empty() {
            body = next.filter(|rest| !next_line(rest).0.is_empty()).map(str::to_string);
            break;
        }
        let (name, value) = parse_header_line(line);
        headers.insert(name, value);
        rest = next;
    }

    Frame {
        command,
        headers,
        body,
    }
}
