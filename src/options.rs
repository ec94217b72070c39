use std::fmt;

use crate::frame::Frame;
use crate::session::{DebugHook, FrameHandler};

/// Optional session configuration, built up with chained setters.
///
/// ```ignore
/// let options = SessionOptions::new()
///     .host("/")
///     .debug(|line| eprintln!("{}", line))
///     .on_error(|frame| eprintln!("broker error: {:?}", frame.get_header("message")));
/// ```
#[derive(Default)]
pub struct SessionOptions {
    /// Virtual host sent as the `host` header of `CONNECT`.
    pub host: Option<String>,
    /// Extra headers appended to `CONNECT` after `login` and `passcode`.
    pub headers: Vec<(String, String)>,
    pub(crate) debug: Option<DebugHook>,
    pub(crate) on_receipt: Option<FrameHandler>,
    pub(crate) on_error: Option<FrameHandler>,
}

impl SessionOptions {
    /// Options with no host, no extra headers and no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual host to send as the `host` header of `CONNECT`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Add an extra `CONNECT` header. `login` and `passcode` always come from
    /// the `connect` call and cannot be overridden here.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Hook receiving every outbound (`>>> `) and inbound (`<<< `) wire
    /// string, plus connection progress notes.
    pub fn debug(mut self, hook: impl FnMut(&str) + Send + 'static) -> Self {
        self.debug = Some(Box::new(hook));
        self
    }

    /// Handler for `RECEIPT` frames.
    pub fn on_receipt(mut self, handler: impl FnMut(&Frame) + Send + 'static) -> Self {
        self.on_receipt = Some(Box::new(handler));
        self
    }

    /// Handler for `ERROR` frames.
    pub fn on_error(mut self, handler: impl FnMut(&Frame) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("host", &self.host)
            .field("headers", &self.headers)
            .field("debug", &self.debug.is_some())
            .field("on_receipt", &self.on_receipt.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
