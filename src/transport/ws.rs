use futures::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tracing::{debug, info, warn};

use super::{EventSink, Link, LinkTask, Transport, TransportError, TransportEvent, TransportEvents};

/// WebSocket transport: one STOMP frame per WebSocket message.
///
/// Outbound frames are sent as text messages. Inbound text messages, and
/// binary messages holding valid UTF-8, are delivered as
/// `TransportEvent::Message`. `open` spawns the socket task, so it must be
/// called from within a tokio runtime.
#[derive(Debug)]
pub struct WebSocketTransport {
    events: EventSink,
    protocols: Option<String>,
    link: Option<Link>,
}

impl WebSocketTransport {
    /// Create a transport and the receiver its events are delivered on.
    pub fn new() -> (Self, TransportEvents) {
        let (events, receiver) = EventSink::channel();
        (
            WebSocketTransport {
                events,
                protocols: None,
                link: None,
            },
            receiver,
        )
    }

    /// Offer WebSocket subprotocols during the handshake (for example
    /// `"v10.stomp, v11.stomp"`, which some brokers require).
    pub fn with_protocols(mut self, protocols: impl Into<String>) -> Self {
        self.protocols = Some(protocols.into());
        self
    }
}

impl Transport for WebSocketTransport {
    fn open(&mut self, url: &str) -> Result<(), TransportError> {
        if self.link.as_ref().is_some_and(Link::is_alive) {
            return Err(TransportError::AlreadyOpen);
        }
        let mut request = url.into_client_request().map_err(Box::new)?;
        if let Some(protocols) = &self.protocols {
            let value = HeaderValue::from_str(protocols).map_err(|e| {
                Box::new(tokio_tungstenite::tungstenite::Error::HttpFormat(e.into()))
            })?;
            request
                .headers_mut()
                .insert("Sec-WebSocket-Protocol", value);
        }

        if let Some(stale) = self.link.take() {
            stale.close();
        }
        let (link, task) = Link::new(&mut self.events);
        self.link = Some(link);
        tokio::spawn(run_socket(url.to_string(), request, task));
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

async fn run_socket(
    url: String,
    request: tokio_tungstenite::tungstenite::handshake::client::Request,
    task: LinkTask,
) {
    let LinkTask {
        mut outbound_rx,
        mut shutdown_rx,
        events,
    } = task;

    let connected = tokio::select! {
        biased;
        _ = &mut shutdown_rx => {
            debug!(%url, "websocket handshake abandoned after local close");
            return;
        }
        connected = connect_async(request) => connected,
    };
    let mut socket = match connected {
        Ok((socket, _response)) => socket,
        Err(e) => {
            warn!(%url, error = %e, "websocket connect failed");
            events.send(TransportEvent::Closed);
            return;
        }
    };
    info!(%url, "websocket connected");
    if !events.send(TransportEvent::Opened) {
        return;
    }

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown_rx => {
                while let Ok(text) = outbound_rx.try_recv() {
                    if socket.send(Message::text(text)).await.is_err() {
                        break;
                    }
                }
                let _ = socket.close(None).await;
                debug!(%url, "websocket closed locally");
                return;
            }
            maybe = outbound_rx.recv() => {
                match maybe {
                    Some(text) => {
                        if let Err(e) = socket.send(Message::text(text)).await {
                            warn!(%url, error = %e, "websocket write failed");
                            break;
                        }
                    }
                    None => break,
                }
            }
            item = socket.next() => {
                match item {
                    Some(Ok(Message::Text(text))) => {
                        let text = text.as_str().to_string();
                        if !events.send(TransportEvent::Message(text)) {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                        Ok(text) => {
                            if !events.send(TransportEvent::Message(text)) {
                                break;
                            }
                        }
                        Err(_) => warn!(%url, len = bytes.len(), "non-utf8 binary message dropped"),
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(%url, error = %e, "websocket read failed");
                        break;
                    }
                }
            }
        }
    }

    info!(%url, "websocket connection lost");
    events.send(TransportEvent::Closed);
}
