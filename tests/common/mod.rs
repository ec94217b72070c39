//! Shared helpers for session integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use stomp_ws::{Frame, Session, Transport, TransportError, TransportEvent};

/// In-memory transport recording every call made by the session.
#[derive(Default)]
pub struct RecordingTransport {
    pub opened: Vec<String>,
    pub sent: Vec<String>,
    pub closes: usize,
}

impl Transport for RecordingTransport {
    fn open(&mut self, url: &str) -> Result<(), TransportError> {
        self.opened.push(url.to_string());
        Ok(())
    }

    fn send(&mut self, text: String) -> Result<(), TransportError> {
        self.sent.push(text);
        Ok(())
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}

/// Collects frames handed to a handler.
pub type Seen = Arc<Mutex<Vec<Frame>>>;

pub fn frame_recorder() -> (Seen, impl FnMut(&Frame) + Send + 'static) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    (seen, move |f: &Frame| sink.lock().unwrap().push(f.clone()))
}

/// A session that has completed the CONNECT / CONNECTED exchange, with the
/// recorded outbound frames cleared.
pub fn connected_session(url: &str) -> Session<RecordingTransport> {
    let mut session = Session::new(url, RecordingTransport::default());
    session
        .connect("guest", "guest", |_| {}, |_| {})
        .expect("connect failed");
    session.handle_event(TransportEvent::Opened);
    session.handle_event(TransportEvent::Message("CONNECTED\nversion: 1.0\n\n\0".into()));
    session.transport_mut().sent.clear();
    session
}
