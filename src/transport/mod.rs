//! The narrow transport surface the session depends on, plus tokio adapters.
//!
//! A transport moves opaque text payloads. It is opened with a URL, accepts
//! outbound text, and reports what happens on the wire as
//! [`TransportEvent`]s. The session never reads the socket itself: the
//! runtime owning the event receiver hands each event to
//! [`crate::Session::handle_event`] one at a time.

pub mod tcp;
pub mod ws;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

pub use tcp::TcpTransport;
pub use ws::WebSocketTransport;

/// Something that happened on an open transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection is established and accepts outbound text.
    Opened,
    /// One inbound text payload (one STOMP frame).
    Message(String),
    /// The connection went away (or never came up). Not reported after a
    /// local `close`.
    Closed,
}

/// Errors returned by transport operations.
#[derive(Error, Debug)]
pub enum TransportError {
    /// `send` was called with no live connection.
    #[error("transport is not open")]
    NotOpen,
    /// `open` was called on a transport that already has a connection.
    #[error("transport is already open")]
    AlreadyOpen,
    /// I/O-level error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// WebSocket handshake or protocol error
    #[error("websocket error: {0}")]
    WebSocket(#[from] Box<tokio_tungstenite::tungstenite::Error>),
}

/// Capability the session needs from the underlying connection.
///
/// Implementations must not block: `open` starts connecting and reports the
/// outcome later through an event, and `send` hands the text off without
/// waiting for the peer.
pub trait Transport {
    /// Start connecting to `url`. Success is reported by an `Opened` event,
    /// failure by a `Closed` event.
    fn open(&mut self, url: &str) -> Result<(), TransportError>;

    /// Transmit one text payload.
    fn send(&mut self, text: String) -> Result<(), TransportError>;

    /// Request closure. Safe to call on a transport that is not open.
    fn close(&mut self);
}

/// Receiving end of a transport's events.
///
/// Every connection a transport opens gets a new generation number. Events
/// are tagged with the generation of the connection that produced them, and
/// `recv` discards any event whose connection has since been closed locally
/// or replaced by a newer `open`. A caller that closes a transport and opens
/// it again therefore never sees a late `Opened`, `Message` or `Closed` from
/// the old connection.
#[derive(Debug)]
pub struct TransportEvents {
    rx: mpsc::UnboundedReceiver<(u64, TransportEvent)>,
    current: Arc<AtomicU64>,
}

impl TransportEvents {
    /// Wait for the next event of the current connection.
    ///
    /// Returns `None` once the owning transport has been dropped and every
    /// queued event has been consumed. Cancel safe: a stale event that was
    /// already discarded is never needed again.
    pub async fn recv(&mut self) -> Option<TransportEvent> {
        loop {
            let (generation, event) = self.rx.recv().await?;
            if self.is_current(generation) {
                return Some(event);
            }
            trace!(generation, ?event, "event from a retired connection dropped");
        }
    }

    /// Non-blocking variant of [`TransportEvents::recv`].
    ///
    /// Returns `None` when no event of the current connection is queued.
    pub fn try_recv(&mut self) -> Option<TransportEvent> {
        while let Ok((generation, event)) = self.rx.try_recv() {
            if self.is_current(generation) {
                return Some(event);
            }
            trace!(generation, ?event, "event from a retired connection dropped");
        }
        None
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.current.load(Ordering::Acquire)
    }
}

/// Sending half shared by an adapter and its socket tasks.
///
/// Generation 0 never belongs to a connection, so storing it in `current`
/// retires whatever connection was live.
#[derive(Debug)]
pub(crate) struct EventSink {
    tx: mpsc::UnboundedSender<(u64, TransportEvent)>,
    current: Arc<AtomicU64>,
    last: u64,
}

impl EventSink {
    pub(crate) fn channel() -> (Self, TransportEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        let current = Arc::new(AtomicU64::new(0));
        (
            EventSink {
                tx,
                current: current.clone(),
                last: 0,
            },
            TransportEvents { rx, current },
        )
    }

    /// Start a new connection generation and retire the previous one.
    fn next_generation(&mut self) -> EventTx {
        self.last += 1;
        self.current.store(self.last, Ordering::Release);
        EventTx {
            tx: self.tx.clone(),
            generation: self.last,
        }
    }
}

/// Event sender owned by one socket task.
#[derive(Debug)]
pub(crate) struct EventTx {
    tx: mpsc::UnboundedSender<(u64, TransportEvent)>,
    generation: u64,
}

impl EventTx {
    /// Report an event. Returns `false` once nobody is listening.
    pub(crate) fn send(&self, event: TransportEvent) -> bool {
        self.tx.send((self.generation, event)).is_ok()
    }
}

/// Handle to the background task that owns one socket.
///
/// Shared by the tokio adapters: outbound text travels over an unbounded
/// channel to the task, and firing (or dropping) `shutdown_tx` tells the task
/// to flush what is queued and close the socket. Closing also retires the
/// link's event generation, so nothing it reports afterwards is delivered.
#[derive(Debug)]
pub(crate) struct Link {
    outbound_tx: mpsc::UnboundedSender<String>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    current: Arc<AtomicU64>,
    generation: u64,
}

/// Receiving ends handed to the socket task.
pub(crate) struct LinkTask {
    pub(crate) outbound_rx: mpsc::UnboundedReceiver<String>,
    pub(crate) shutdown_rx: oneshot::Receiver<()>,
    pub(crate) events: EventTx,
}

impl Link {
    /// Create the link for a new connection, retiring the previous one.
    pub(crate) fn new(sink: &mut EventSink) -> (Self, LinkTask) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let events = sink.next_generation();
        (
            Link {
                outbound_tx,
                shutdown_tx: Some(shutdown_tx),
                current: sink.current.clone(),
                generation: events.generation,
            },
            LinkTask {
                outbound_rx,
                shutdown_rx,
                events,
            },
        )
    }

    /// Queue text for the socket task. Fails once the task has exited.
    pub(crate) fn send(&self, text: String) -> Result<(), TransportError> {
        self.outbound_tx
            .send(text)
            .map_err(|_| TransportError::NotOpen)
    }

    pub(crate) fn is_alive(&self) -> bool {
        !self.outbound_tx.is_closed()
    }

    pub(crate) fn close(mut self) {
        // only retire our own generation; a newer link may already be current
        let _ = self.current.compare_exchange(
            self.generation,
            0,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        if let Some(tx) = self.shutdown_tx.take() {
            if tx.send(()).is_err() {
                debug!("socket task already finished");
            }
        }
    }
}
