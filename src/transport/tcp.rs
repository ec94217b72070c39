use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use super::{EventSink, Link, LinkTask, Transport, TransportError, TransportEvent, TransportEvents};
use crate::codec::StompCodec;

/// Raw TCP transport: STOMP frames are delimited on the byte stream by the
/// NUL terminator, using [`StompCodec`].
///
/// The URL is a `host:port` address; a leading `tcp://` is accepted and
/// stripped. `open` spawns the socket task, so it must be called from within
/// a tokio runtime.
#[derive(Debug)]
pub struct TcpTransport {
    events: EventSink,
    link: Option<Link>,
}

impl TcpTransport {
    /// Create a transport and the receiver its events are delivered on.
    pub fn new() -> (Self, TransportEvents) {
        let (events, receiver) = EventSink::channel();
        (TcpTransport { events, link: None }, receiver)
    }
}

impl Transport for TcpTransport {
    fn open(&mut self, url: &str) -> Result<(), TransportError> {
        if self.link.as_ref().is_some_and(Link::is_alive) {
            return Err(TransportError::AlreadyOpen);
        }
        let addr = url.strip_prefix("tcp://").unwrap_or(url).to_string();
        if let Some(stale) = self.link.take() {
            stale.close();
        }
        let (link, task) = Link::new(&mut self.events);
        self.link = Some(link);
        tokio::spawn(run_socket(addr, task));
        Ok(())
    }

    fn send(&mut self, text: String) -> Result<(), TransportError> {
        match &self.link {
            Some(link) => link.send(text),
            None => Err(TransportError::NotOpen),
        }
    }

    fn close(&mut self) {
        if let Some(link) = self.link.take() {
            link.close();
        }
    }
}

async fn run_socket(addr: String, task: LinkTask) {
    let LinkTask {
        mut outbound_rx,
        mut shutdown_rx,
        events,
    } = task;

    let connected = tokio::select! {
        biased;
        _ = &mut shutdown_rx => {
            debug!(%addr, "tcp connect abandoned after local close");
            return;
        }
        connected = TcpStream::connect(&addr) => connected,
    };
    let stream = match connected {
        Ok(stream) => stream,
        Err(e) => {
            warn!(%addr, error = %e, "tcp connect failed");
            events.send(TransportEvent::Closed);
            return;
        }
    };
    info!(%addr, "tcp connected");
    let mut framed = Framed::new(stream, StompCodec::new());
    if !events.send(TransportEvent::Opened) {
        return;
    }

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown_rx => {
                // Flush what the session queued before asking to close
                // (typically DISCONNECT).
                while let Ok(text) = outbound_rx.try_recv() {
                    if framed.send(text).await.is_err() {
                        break;
                    }
                }
                let _ = framed.close().await;
                debug!(%addr, "tcp closed locally");
                return;
            }
            maybe = outbound_rx.recv() => {
                match maybe {
                    Some(text) => {
                        if let Err(e) = framed.send(text).await {
                            warn!(%addr, error = %e, "tcp write failed");
                            break;
                        }
                    }
                    None => break,
                }
            }
            item = framed.next() => {
                match item {
                    Some(Ok(text)) => {
                        if !events.send(TransportEvent::Message(text)) {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!(%addr, error = %e, "tcp read failed");
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    info!(%addr, "tcp connection lost");
    events.send(TransportEvent::Closed);
}
