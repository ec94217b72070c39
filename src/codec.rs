use bytes::{Buf, BufMut, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};

use crate::frame::Frame;
use crate::parser::parse;

/// Sentinel closing every frame on the wire.
pub const FRAME_TERMINATOR: char = '\0';

/// Render a frame and append the frame terminator.
pub fn marshall(frame: &Frame) -> String {
    let mut out = frame.render();
    out.push(FRAME_TERMINATOR);
    out
}

/// Parse wire text (with or without its terminator) into a frame.
///
/// Alias of [`crate::parser::parse`]; like it, this never fails.
pub fn unmarshall(text: &str) -> Frame {
    parse(text)
}

/// `StompCodec` implements `tokio_util::codec::{Decoder, Encoder}` for
/// NUL-terminated STOMP text frames on a byte stream.
///
/// The decoder yields the raw text of one frame (terminator stripped) so a
/// stream transport hands the session exactly what a message-oriented
/// transport would. Bodies are text only; `content-length` framing is not
/// supported, so a NUL inside a body always ends the frame.
#[derive(Debug, Default)]
pub struct StompCodec {}

impl StompCodec {
    pub fn new() -> Self {
        Self {}
    }
}

impl Decoder for StompCodec {
    type Item = String;
    type Error = io::Error;

    /// Decode one frame from `src`.
    ///
    /// Returns
    /// - `Ok(Some(text))` when a terminator was found; the frame bytes and
    ///   the terminator are consumed from `src`.
    /// - `Ok(None)` when more bytes are required. End-of-line bytes sent
    ///   between frames are consumed and ignored.
    /// - `Err(io::Error)` with `InvalidData` when the frame is not UTF-8.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let eols = src
            .iter()
            .take_while(|&&b| b == b'\n' || b == b'\r')
            .count();
        src.advance(eols);

        let Some(end) = src.iter().position(|&b| b == 0) else {
            return Ok(None);
        };
        let raw = src.split_to(end + 1);
        let text = std::str::from_utf8(&raw[..end]).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid utf8 in frame: {}", e),
            )
        })?;
        Ok(Some(text.to_string()))
    }
}

impl Encoder<String> for StompCodec {
    type Error = io::Error;

    /// Write already-marshalled frame text. The terminator is appended when
    /// the text does not end with one.
    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(item.as_bytes());
        if !item.ends_with(FRAME_TERMINATOR) {
            dst.put_u8(0);
        }
        Ok(())
    }
}
