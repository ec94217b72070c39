//! Unit tests for Frame, Headers and rendering.

use stomp_ws::{Command, Frame, Headers, marshall};

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn frame_new_creates_empty() {
    let frame = Frame::new("SEND");
    assert_eq!(frame.command, Command::Send);
    assert!(frame.headers.is_empty());
    assert!(frame.body.is_none());
}

#[test]
fn frame_build_without_headers() {
    let frame = Frame::build(Command::Ack, None, None);
    assert!(frame.headers.is_empty());
    assert!(frame.body.is_none());
}

#[test]
fn frame_build_keeps_inputs_as_is() {
    let headers = Headers::from(vec![(" spaced ", " value ")]);
    let frame = Frame::build("SEND", Some(headers), Some(String::new()));
    assert_eq!(frame.get_header(" spaced "), Some(" value "));
    assert_eq!(frame.body.as_deref(), Some(""));
}

#[test]
fn frame_unknown_command_is_preserved() {
    let frame = Frame::new("STOMP");
    assert_eq!(frame.command, Command::Unknown("STOMP".to_string()));
    assert_eq!(frame.render(), "STOMP\n\n");
}

// =============================================================================
// Builder Pattern Tests
// =============================================================================

#[test]
fn frame_header_preserves_order() {
    let frame = Frame::new("SEND")
        .header("z-header", "z")
        .header("a-header", "a")
        .header("m-header", "m");
    let names: Vec<&str> = frame.headers.iter().map(|(k, _)| k).collect();
    assert_eq!(names, vec!["z-header", "a-header", "m-header"]);
}

#[test]
fn frame_repeated_header_replaces_value() {
    let frame = Frame::new("SEND")
        .header("custom", "first")
        .header("other", "x")
        .header("custom", "second");
    assert_eq!(frame.headers.len(), 2);
    assert_eq!(frame.get_header("custom"), Some("second"));
    assert_eq!(frame.headers.iter().next(), Some(("custom", "second")));
}

#[test]
fn frame_builder_chain() {
    let frame = Frame::new("SEND")
        .header("destination", "/queue/test")
        .header("content-type", "application/json")
        .set_body("{\"key\": \"value\"}");

    assert_eq!(frame.command, Command::Send);
    assert_eq!(frame.headers.len(), 2);
    assert_eq!(frame.body.as_deref(), Some("{\"key\": \"value\"}"));
}

// =============================================================================
// Rendering Tests
// =============================================================================

#[test]
fn render_no_body_framing() {
    assert_eq!(Frame::build("SEND", Some(Headers::new()), None).render(), "SEND\n\n");
}

#[test]
fn render_headers_and_body() {
    let frame = Frame::new("MESSAGE")
        .header("destination", "/topic/x")
        .header("message-id", "42")
        .set_body("line 1\nline 2");
    assert_eq!(
        frame.render(),
        "MESSAGE\ndestination: /topic/x\nmessage-id: 42\n\nline 1\nline 2"
    );
    assert_eq!(format!("{}", frame), frame.render());
}

#[test]
fn render_empty_body_matches_absent() {
    let empty = Frame::new("SEND").set_body("");
    let absent = Frame::new("SEND");
    assert_eq!(empty.render(), absent.render());
}

#[test]
fn marshall_adds_single_terminator() {
    let frame = Frame::new("SEND").header("destination", "/q").set_body("x");
    let wire = marshall(&frame);
    assert!(wire.ends_with("x\0"));
    assert_eq!(wire.matches('\0').count(), 1);
}

// =============================================================================
// Headers Tests
// =============================================================================

#[test]
fn headers_collect_from_iterator() {
    let headers: Headers = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
    assert_eq!(headers.len(), 2);
    assert_eq!(headers.get("a"), Some("3"));
    assert!(headers.contains_key("b"));
    assert!(!headers.contains_key("c"));
}

#[test]
fn headers_into_iter_owned() {
    let headers = Headers::from(vec![("k", "v")]);
    let pairs: Vec<(String, String)> = headers.into_iter().collect();
    assert_eq!(pairs, vec![("k".to_string(), "v".to_string())]);
}

#[test]
fn headers_are_case_sensitive() {
    let headers = Headers::from(vec![("Destination", "/a")]);
    assert_eq!(headers.get("destination"), None);
}
