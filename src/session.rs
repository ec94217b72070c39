use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::codec::marshall;
use crate::command::Command;
use crate::frame::{Frame, Headers};
use crate::options::SessionOptions;
use crate::parser::parse;
use crate::transport::{Transport, TransportError, TransportEvent};

/// Callback receiving a frame (connect, message, receipt and error handlers).
pub type FrameHandler = Box<dyn FnMut(&Frame) + Send>;

/// Callback receiving a human-readable connection-loss message.
pub type ErrorHandler = Box<dyn FnMut(&str) + Send>;

/// Callback receiving raw wire strings and progress notes.
pub type DebugHook = Box<dyn FnMut(&str) + Send>;

/// Errors returned by `Session` operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// `connect` was called while a connection attempt or connection is
    /// live. Disconnect first.
    #[error("session already started; disconnect before connecting again")]
    AlreadyConnected,
    /// An outbound operation was attempted without an open transport.
    #[error("not connected")]
    NotConnected,
    /// The transport refused the operation.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Connection lifecycle of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    /// Transport requested or open, `CONNECTED` not yet received.
    Connecting,
    Connected,
}

/// A single STOMP client connection.
///
/// The session owns its transport, the credentials of the current
/// connection attempt, the destination -> handler registry and the
/// application handlers. It never reads the transport on its own: the code
/// that owns the transport's event receiver must pass every event to
/// [`Session::handle_event`], one at a time and from the same logical context
/// as the application calls. Nothing here locks, blocks, retries or times
/// out. A broker that never answers leaves the session in `Connecting`.
///
/// Outbound operations are fire-and-forget: they write one frame to the
/// transport and return. Any answer arrives later as an inbound frame.
///
/// Handlers run synchronously inside `handle_event` and cannot call back
/// into the session; forward work through a channel instead.
pub struct Session<T: Transport> {
    url: String,
    transport: T,
    state: SessionState,
    transport_open: bool,
    login: String,
    passcode: String,
    host: Option<String>,
    connect_headers: Vec<(String, String)>,
    on_connected: Option<FrameHandler>,
    on_connection_lost: Option<ErrorHandler>,
    on_receipt: Option<FrameHandler>,
    on_error: Option<FrameHandler>,
    debug: Option<DebugHook>,
    /// One handler per destination. Subscribing again replaces the handler,
    /// so two parts of an application cannot share a destination.
    subscriptions: HashMap<String, FrameHandler>,
}

impl<T: Transport> Session<T> {
    /// Create a disconnected session for `url` over `transport`.
    pub fn new(url: impl Into<String>, transport: T) -> Self {
        Self::with_options(url, transport, SessionOptions::default())
    }

    /// Create a disconnected session with a host, extra `CONNECT` headers,
    /// handlers or a debug hook taken from `options`.
    pub fn with_options(url: impl Into<String>, transport: T, options: SessionOptions) -> Self {
        Self {
            url: url.into(),
            transport,
            state: SessionState::Disconnected,
            transport_open: false,
            login: String::new(),
            passcode: String::new(),
            host: options.host,
            connect_headers: options.headers,
            on_connected: None,
            on_connection_lost: None,
            on_receipt: options.on_receipt,
            on_error: options.on_error,
            debug: options.debug,
            subscriptions: HashMap::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The URL passed to the transport on `connect`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Install (or replace) the debug hook.
    ///
    /// The hook receives every outbound frame as `>>> <text>`, every inbound
    /// payload as `<<< <text>`, and connection progress notes.
    pub fn set_debug(&mut self, hook: impl FnMut(&str) + Send + 'static) {
        self.debug = Some(Box::new(hook));
    }

    /// Set the handler for `RECEIPT` frames.
    pub fn set_on_receipt(&mut self, handler: impl FnMut(&Frame) + Send + 'static) {
        self.on_receipt = Some(Box::new(handler));
    }

    /// Set the handler for `ERROR` frames.
    pub fn set_on_error(&mut self, handler: impl FnMut(&Frame) + Send + 'static) {
        self.on_error = Some(Box::new(handler));
    }

    /// Returns `true` if a handler is registered for `destination`.
    pub fn is_subscribed(&self, destination: &str) -> bool {
        self.subscriptions.contains_key(destination)
    }

    /// Destinations that currently have a handler, in no particular order.
    pub fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.keys().cloned().collect()
    }

    /// Start a connection attempt.
    ///
    /// Opens the transport and stores the credentials and callbacks. The
    /// `CONNECT` frame goes out once the transport reports it is open;
    /// `on_connected` runs when the broker answers `CONNECTED`, and
    /// `on_connection_lost` runs (once) if the transport closes before an
    /// explicit [`Session::disconnect`].
    ///
    /// Only valid from `Disconnected`: calling it again while connecting or
    /// connected returns `SessionError::AlreadyConnected` and changes nothing.
    pub fn connect<C, E>(
        &mut self,
        login: impl Into<String>,
        passcode: impl Into<String>,
        on_connected: C,
        on_connection_lost: E,
    ) -> Result<(), SessionError>
    where
        C: FnMut(&Frame) + Send + 'static,
        E: FnMut(&str) + Send + 'static,
    {
        if self.state != SessionState::Disconnected {
            return Err(SessionError::AlreadyConnected);
        }
        self.emit_debug(&format!("opening transport to {}", self.url));
        info!(url = %self.url, "opening transport");

        self.login = login.into();
        self.passcode = passcode.into();
        self.on_connected = Some(Box::new(on_connected));
        self.on_connection_lost = Some(Box::new(on_connection_lost));

        self.transport.open(&self.url)?;
        self.state = SessionState::Connecting;
        Ok(())
    }

    /// Send `DISCONNECT`, close the transport, then run `on_disconnected`.
    ///
    /// The callback runs as soon as closure has been requested, not when the
    /// transport confirms it. Returns `NotConnected` when there is no session
    /// to end; a failed `DISCONNECT` write is returned after the transport
    /// has been closed and the callback has run.
    pub fn disconnect(&mut self, on_disconnected: impl FnOnce()) -> Result<(), SessionError> {
        if self.state == SessionState::Disconnected {
            return Err(SessionError::NotConnected);
        }
        let sent = if self.transport_open {
            self.transmit(Command::Disconnect, Headers::new(), None)
        } else {
            Ok(())
        };
        self.transport.close();
        self.transport_open = false;
        self.state = SessionState::Disconnected;
        self.on_connected = None;
        self.on_connection_lost = None;
        info!(url = %self.url, "disconnected");
        on_disconnected();
        sent
    }

    /// Send a message to `destination`.
    ///
    /// Parameters
    /// - `destination`: injected as the `destination` header, replacing any
    ///   caller value.
    /// - `headers`: extra headers, written in the order supplied.
    /// - `body`: optional text body.
    ///
    /// Returns `NotConnected` when the transport is not open, or the
    /// transport's error if the write is refused.
    pub fn send(
        &mut self,
        destination: &str,
        headers: Option<Headers>,
        body: Option<String>,
    ) -> Result<(), SessionError> {
        let mut headers = headers.unwrap_or_default();
        headers.insert("destination", destination);
        self.transmit(Command::Send, headers, body)
    }

    /// Register `handler` for `destination` and send `SUBSCRIBE`.
    ///
    /// Replaces any handler already registered for the destination.
    pub fn subscribe(
        &mut self,
        destination: &str,
        headers: Option<Headers>,
        handler: impl FnMut(&Frame) + Send + 'static,
    ) -> Result<(), SessionError> {
        if !self.transport_open {
            return Err(SessionError::NotConnected);
        }
        if self
            .subscriptions
            .insert(destination.to_string(), Box::new(handler))
            .is_some()
        {
            debug!(%destination, "subscription handler replaced");
        }
        let mut headers = headers.unwrap_or_default();
        headers.insert("destination", destination);
        self.transmit(Command::Subscribe, headers, None)
    }

    /// Drop the handler for `destination` and send `UNSUBSCRIBE`.
    ///
    /// The handler is removed even when the frame cannot be sent.
    pub fn unsubscribe(
        &mut self,
        destination: &str,
        headers: Option<Headers>,
    ) -> Result<(), SessionError> {
        self.subscriptions.remove(destination);
        let mut headers = headers.unwrap_or_default();
        headers.insert("destination", destination);
        self.transmit(Command::Unsubscribe, headers, None)
    }

    /// Begin a broker-side transaction.
    ///
    /// Parameters
    /// - `transaction`: id sent as the `transaction` header, replacing any
    ///   caller value. Ids are not tracked or validated locally.
    /// - `headers`: extra headers for the frame.
    ///
    /// Returns `NotConnected` when the transport is not open.
    pub fn begin(&mut self, transaction: &str, headers: Option<Headers>) -> Result<(), SessionError> {
        self.transaction_frame(Command::Begin, transaction, headers)
    }

    /// Commit a transaction; see [`Session::begin`] for the parameters.
    pub fn commit(&mut self, transaction: &str, headers: Option<Headers>) -> Result<(), SessionError> {
        self.transaction_frame(Command::Commit, transaction, headers)
    }

    /// Roll back a transaction; see [`Session::begin`] for the parameters.
    pub fn abort(&mut self, transaction: &str, headers: Option<Headers>) -> Result<(), SessionError> {
        self.transaction_frame(Command::Abort, transaction, headers)
    }

    /// Acknowledge a received message by its `message-id`.
    pub fn ack(&mut self, message_id: &str, headers: Option<Headers>) -> Result<(), SessionError> {
        let mut headers = headers.unwrap_or_default();
        headers.insert("message-id", message_id);
        self.transmit(Command::Ack, headers, None)
    }

    /// Route one transport event.
    pub fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => self.handle_open(),
            TransportEvent::Message(text) => self.handle_message(&text),
            TransportEvent::Closed => self.handle_close(),
        }
    }

    /// The transport is open: send `CONNECT` with the stored credentials.
    pub fn handle_open(&mut self) {
        if self.state != SessionState::Connecting {
            warn!(state = ?self.state, "transport opened outside of a connection attempt; ignored");
            return;
        }
        self.transport_open = true;
        self.emit_debug("transport opened");

        let mut headers = Headers::new();
        headers.insert("login", self.login.as_str());
        headers.insert("passcode", self.passcode.as_str());
        if let Some(host) = &self.host {
            headers.insert("host", host.as_str());
        }
        for (k, v) in &self.connect_headers {
            if !headers.contains_key(k) {
                headers.insert(k.as_str(), v.as_str());
            }
        }
        if let Err(e) = self.transmit(Command::Connect, headers, None) {
            warn!(error = %e, "failed to send CONNECT");
        }
    }

    /// Parse inbound text and dispatch the frame.
    pub fn handle_message(&mut self, text: &str) {
        self.emit_debug(&format!("<<< {}", text));
        let frame = parse(text);
        trace!(command = %frame.command, "frame received");
        self.dispatch(frame);
    }

    /// The transport went away.
    ///
    /// If the session was not ended with `disconnect`, the connection-loss
    /// callback runs once and the session becomes `Disconnected`. Closure
    /// reports after that are ignored.
    pub fn handle_close(&mut self) {
        self.transport_open = false;
        if self.state == SessionState::Disconnected {
            debug!(url = %self.url, "close reported for a disconnected session; ignored");
            return;
        }
        self.state = SessionState::Disconnected;
        self.transport.close();
        self.on_connected = None;

        let msg = format!("lost connection to {}", self.url);
        self.emit_debug(&msg);
        warn!(url = %self.url, "connection lost");
        if let Some(mut callback) = self.on_connection_lost.take() {
            callback(&msg);
        }
    }

    fn dispatch(&mut self, frame: Frame) {
        if !frame.command.is_server_command() {
            warn!(command = %frame.command, "client-only or unknown command from broker; dropped");
            return;
        }
        match &frame.command {
            Command::Connected => {
                if self.state != SessionState::Connecting {
                    warn!(state = ?self.state, "CONNECTED outside of a connection attempt; dropped");
                    return;
                }
                self.state = SessionState::Connected;
                info!(url = %self.url, "connected");
                if let Some(callback) = self.on_connected.as_mut() {
                    callback(&frame);
                }
            }
            Command::Message => {
                let handler = frame
                    .get_header("destination")
                    .and_then(|destination| self.subscriptions.get_mut(destination));
                match handler {
                    Some(handler) => handler(&frame),
                    None => debug!(
                        destination = frame.get_header("destination").unwrap_or_default(),
                        "no subscription for MESSAGE; dropped"
                    ),
                }
            }
            Command::Receipt => match self.on_receipt.as_mut() {
                Some(handler) => handler(&frame),
                None => trace!("RECEIPT without handler; dropped"),
            },
            Command::Error => match self.on_error.as_mut() {
                Some(handler) => handler(&frame),
                None => debug!(message = frame.get_header("message").unwrap_or_default(), "ERROR without handler; dropped"),
            },
            other => trace!(command = %other, "unhandled command; dropped"),
        }
    }

    fn transaction_frame(
        &mut self,
        command: Command,
        transaction: &str,
        headers: Option<Headers>,
    ) -> Result<(), SessionError> {
        let mut headers = headers.unwrap_or_default();
        headers.insert("transaction", transaction);
        self.transmit(command, headers, None)
    }

    fn transmit(
        &mut self,
        command: Command,
        headers: Headers,
        body: Option<String>,
    ) -> Result<(), SessionError> {
        if !self.transport_open {
            return Err(SessionError::NotConnected);
        }
        let frame = Frame::build(command, Some(headers), body);
        let out = marshall(&frame);
        self.emit_debug(&format!(">>> {}", out));
        trace!(command = %frame.command, "sending frame");
        self.transport.send(out)?;
        Ok(())
    }

    fn emit_debug(&mut self, line: &str) {
        if let Some(hook) = self.debug.as_mut() {
            hook(line);
        }
    }
}

impl<T: Transport> fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("url", &self.url)
            .field("state", &self.state)
            .field("transport_open", &self.transport_open)
            .field("subscriptions", &self.subscriptions.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// In-memory transport recording every call.
    #[derive(Default)]
    struct RecordingTransport {
        opened: Vec<String>,
        sent: Vec<String>,
        closes: usize,
        fail_sends: bool,
    }

    impl Transport for RecordingTransport {
        fn open(&mut self, url: &str) -> Result<(), TransportError> {
            self.opened.push(url.to_string());
            Ok(())
        }

        fn send(&mut self, text: String) -> Result<(), TransportError> {
            if self.fail_sends {
                return Err(TransportError::NotOpen);
            }
            self.sent.push(text);
            Ok(())
        }

        fn close(&mut self) {
            self.closes += 1;
        }
    }

    fn connected_session() -> Session<RecordingTransport> {
        let mut session = Session::new("ws://broker/stomp", RecordingTransport::default());
        session.connect("u", "p", |_| {}, |_| {}).expect("connect failed");
        session.handle_event(TransportEvent::Opened);
        session.handle_message("CONNECTED\n\n\0");
        session.transport_mut().sent.clear();
        session
    }

    fn recorder() -> (Arc<Mutex<Vec<Frame>>>, impl FnMut(&Frame) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |f: &Frame| sink.lock().unwrap().push(f.clone()))
    }

    #[test]
    fn test_connect_sequence() {
        let (seen, on_connected) = recorder();
        let mut session = Session::new("ws://broker/stomp", RecordingTransport::default());

        session.connect("u", "p", on_connected, |_| {}).unwrap();
        assert_eq!(session.state(), SessionState::Connecting);
        assert_eq!(session.transport().opened, vec!["ws://broker/stomp"]);
        assert!(session.transport().sent.is_empty());

        session.handle_event(TransportEvent::Opened);
        assert_eq!(session.transport().sent, vec!["CONNECT\nlogin: u\npasscode: p\n\n\0"]);
        assert_eq!(session.state(), SessionState::Connecting);

        session.handle_event(TransportEvent::Message("CONNECTED\nsession: s1\n\n\0".into()));
        assert_eq!(session.state(), SessionState::Connected);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].get_header("session"), Some("s1"));
    }

    #[test]
    fn test_connect_twice_is_rejected() {
        let mut session = connected_session();
        assert!(matches!(
            session.connect("u", "p", |_| {}, |_| {}),
            Err(SessionError::AlreadyConnected)
        ));
        assert_eq!(session.transport().opened.len(), 1);
    }

    #[test]
    fn test_second_connected_frame_is_dropped() {
        let (seen, on_connected) = recorder();
        let mut session = Session::new("ws://b", RecordingTransport::default());
        session.connect("u", "p", on_connected, |_| {}).unwrap();
        session.handle_open();
        session.handle_message("CONNECTED\n\n");
        session.handle_message("CONNECTED\n\n");
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_extra_connect_headers() {
        let options = SessionOptions::new().host("/vhost").header("client-id", "c1").header("login", "ignored");
        let mut session = Session::with_options("ws://b", RecordingTransport::default(), options);
        session.connect("u", "p", |_| {}, |_| {}).unwrap();
        session.handle_open();
        assert_eq!(
            session.transport().sent,
            vec!["CONNECT\nlogin: u\npasscode: p\nhost: /vhost\nclient-id: c1\n\n\0"]
        );
    }

    #[test]
    fn test_unexpected_close_reports_once() {
        let lost = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = lost.clone();
        let mut session = Session::new("ws://broker/stomp", RecordingTransport::default());
        session
            .connect("u", "p", |_| {}, move |msg: &str| sink.lock().unwrap().push(msg.to_string()))
            .unwrap();
        session.handle_open();
        session.handle_message("CONNECTED\n\n");
        session.transport_mut().sent.clear();

        session.handle_event(TransportEvent::Closed);
        session.handle_event(TransportEvent::Closed);

        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(*lost.lock().unwrap(), vec!["lost connection to ws://broker/stomp"]);
        assert!(matches!(
            session.send("/queue/a", None, Some("x".into())),
            Err(SessionError::NotConnected)
        ));
        assert!(session.transport().sent.is_empty());
    }

    #[test]
    fn test_disconnect_order_and_no_error_callback() {
        let lost = Arc::new(Mutex::new(0usize));
        let sink = lost.clone();
        let mut session = Session::new("ws://b", RecordingTransport::default());
        session
            .connect("u", "p", |_| {}, move |_: &str| *sink.lock().unwrap() += 1)
            .unwrap();
        session.handle_open();
        session.handle_message("CONNECTED\n\n");

        let mut called = false;
        session.disconnect(|| called = true).unwrap();
        assert!(called);
        assert_eq!(session.transport().sent.last().map(String::as_str), Some("DISCONNECT\n\n\0"));
        assert_eq!(session.transport().closes, 1);
        assert_eq!(session.state(), SessionState::Disconnected);

        // the transport may still report closure afterwards
        session.handle_close();
        assert_eq!(*lost.lock().unwrap(), 0);
    }

    #[test]
    fn test_disconnect_when_disconnected() {
        let mut session = Session::new("ws://b", RecordingTransport::default());
        assert!(matches!(session.disconnect(|| {}), Err(SessionError::NotConnected)));
    }

    #[test]
    fn test_reconnect_after_loss() {
        let mut session = connected_session();
        session.handle_close();
        session.connect("u2", "p2", |_| {}, |_| {}).unwrap();
        session.handle_open();
        assert_eq!(
            session.transport().sent.last().map(String::as_str),
            Some("CONNECT\nlogin: u2\npasscode: p2\n\n\0")
        );
    }

    #[test]
    fn test_outbound_before_open_is_rejected() {
        let mut session = Session::new("ws://b", RecordingTransport::default());
        session.connect("u", "p", |_| {}, |_| {}).unwrap();
        assert!(matches!(session.begin("tx", None), Err(SessionError::NotConnected)));
        assert!(session.transport().sent.is_empty());
    }

    #[test]
    fn test_send_injects_destination() {
        let mut session = connected_session();
        let headers = Headers::from(vec![("destination", "/queue/wrong"), ("priority", "4")]);
        session.send("/queue/a", Some(headers), Some("hello".into())).unwrap();
        assert_eq!(
            session.transport().sent,
            vec!["SEND\ndestination: /queue/a\npriority: 4\n\nhello\0"]
        );
    }

    #[test]
    fn test_subscription_replace() {
        let mut session = connected_session();
        let (first, h1) = recorder();
        let (second, h2) = recorder();
        session.subscribe("/queue/a", None, h1).unwrap();
        session.subscribe("/queue/a", None, h2).unwrap();
        assert_eq!(session.subscriptions(), vec!["/queue/a".to_string()]);

        session.handle_message("MESSAGE\ndestination: /queue/a\n\nhi\0");
        assert!(first.lock().unwrap().is_empty());
        assert_eq!(second.lock().unwrap().len(), 1);
        assert_eq!(second.lock().unwrap()[0].body.as_deref(), Some("hi"));
        assert_eq!(
            session.transport().sent,
            vec![
                "SUBSCRIBE\ndestination: /queue/a\n\n\0",
                "SUBSCRIBE\ndestination: /queue/a\n\n\0"
            ]
        );
    }

    #[test]
    fn test_unsubscribe_removes_dispatch() {
        let mut session = connected_session();
        let (seen, handler) = recorder();
        session.subscribe("/queue/a", None, handler).unwrap();
        session.unsubscribe("/queue/a", None).unwrap();
        assert!(!session.is_subscribed("/queue/a"));
        session.handle_message("MESSAGE\ndestination: /queue/a\n\nhi\0");
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(
            session.transport().sent.last().map(String::as_str),
            Some("UNSUBSCRIBE\ndestination: /queue/a\n\n\0")
        );
    }

    #[test]
    fn test_message_without_subscription_is_dropped() {
        let mut session = connected_session();
        session.handle_message("MESSAGE\ndestination: /queue/none\n\nhi\0");
        session.handle_message("MESSAGE\n\nno destination\0");
        assert!(session.transport().sent.is_empty());
    }

    #[test]
    fn test_receipt_and_error_handlers() {
        let (receipts, on_receipt) = recorder();
        let (errors, on_error) = recorder();
        let options = SessionOptions::new().on_receipt(on_receipt).on_error(on_error);
        let mut session = Session::with_options("ws://b", RecordingTransport::default(), options);
        session.connect("u", "p", |_| {}, |_| {}).unwrap();
        session.handle_open();

        session.handle_message("ERROR\nmessage: bad login\n\n\0");
        session.handle_message("RECEIPT\nreceipt-id: 1\n\n\0");
        session.handle_message("NOPE\n\n\0");

        assert_eq!(errors.lock().unwrap()[0].get_header("message"), Some("bad login"));
        assert_eq!(receipts.lock().unwrap()[0].get_header("receipt-id"), Some("1"));
        assert_eq!(errors.lock().unwrap().len(), 1);
        assert_eq!(receipts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_transactions_and_ack() {
        let mut session = connected_session();
        session.begin("tx1", None).unwrap();
        session.ack("m-7", Some(Headers::from(vec![("transaction", "tx1")]))).unwrap();
        session.commit("tx1", None).unwrap();
        session.abort("tx2", None).unwrap();
        assert_eq!(
            session.transport().sent,
            vec![
                "BEGIN\ntransaction: tx1\n\n\0",
                "ACK\ntransaction: tx1\nmessage-id: m-7\n\n\0",
                "COMMIT\ntransaction: tx1\n\n\0",
                "ABORT\ntransaction: tx2\n\n\0",
            ]
        );
    }

    #[test]
    fn test_debug_hook_sees_wire_text() {
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = lines.clone();
        let mut session = Session::new("ws://b", RecordingTransport::default());
        session.set_debug(move |line| sink.lock().unwrap().push(line.to_string()));
        session.connect("u", "p", |_| {}, |_| {}).unwrap();
        session.handle_open();
        session.handle_message("CONNECTED\n\n\0");

        let lines = lines.lock().unwrap();
        assert_eq!(lines[0], "opening transport to ws://b");
        assert_eq!(lines[1], "transport opened");
        assert_eq!(lines[2], ">>> CONNECT\nlogin: u\npasscode: p\n\n\0");
        assert_eq!(lines[3], "<<< CONNECTED\n\n\0");
    }

    #[test]
    fn test_transport_failure_surfaces() {
        let mut session = connected_session();
        session.transport_mut().fail_sends = true;
        assert!(matches!(
            session.send("/queue/a", None, None),
            Err(SessionError::Transport(TransportError::NotOpen))
        ));
    }
}
