//! STOMP client over a message-oriented transport.
//!
//! The crate has two layers:
//!
//! - the frame codec ([`Frame`], [`parser::parse`], [`codec::marshall`]),
//!   which turns frames into wire text and back;
//! - the [`Session`], a single-connection state machine that builds
//!   outbound frames, keeps the destination -> handler registry and
//!   dispatches inbound frames.
//!
//! The session talks to the network only through the [`Transport`] trait.
//! [`WebSocketTransport`] and [`TcpTransport`] are tokio adapters that report
//! [`TransportEvent`]s on a channel; the caller feeds those events to
//! [`Session::handle_event`].
//!
//! ```ignore
//! let (transport, mut events) = WebSocketTransport::new();
//! let mut session = Session::new("ws://127.0.0.1:15674/ws", transport);
//! session.connect("guest", "guest", |frame| println!("connected: {:?}", frame), |msg| eprintln!("{}", msg))?;
//! while let Some(event) = events.recv().await {
//!     session.handle_event(event);
//! }
//! ```

pub mod codec;
pub mod command;
pub mod frame;
pub mod logging;
pub mod options;
pub mod parser;
pub mod session;
pub mod transport;

pub use codec::{FRAME_TERMINATOR, StompCodec, marshall, unmarshall};
pub use command::Command;
pub use frame::{Frame, Headers};
pub use options::SessionOptions;
pub use parser::parse;
pub use session::{Session, SessionError, SessionState};
pub use transport::{
    TcpTransport, Transport, TransportError, TransportEvent, TransportEvents, WebSocketTransport,
};
