//! Command-port frame structure and encoding/decoding

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    command::Command,
    constants::MAGIC,
    error::{Error, Result},
};

/// One frame on the command port
///
/// # Frame Structure
///
/// ```text
/// ┌─────────────┬─────────────┬─────────────┬─────────────┬──────┐
/// │    Magic    │  CommandId  │ PayloadLen  │   Payload   │ NUL  │
/// │   8 bytes   │   4 bytes   │   4 bytes   │   N bytes   │  1   │
/// │ "DRINETTM"  │  (BE u32)   │  (BE u32)   │   (bytes)   │      │
/// └─────────────┴─────────────┴─────────────┴─────────────┴──────┘
/// ```
///
/// `PayloadLen` counts the trailing NUL. An empty payload is sent as
/// `PayloadLen = 0` with neither payload nor terminator.
///
/// # Examples
///
/// ```
/// use drobo_core::{Command, Frame, FrameHeader};
///
/// let frame = Frame::with_payload(Command::Request, &b"<TMCmd/>"[..]);
/// let encoded = frame.encode();
///
/// let header = FrameHeader::decode(&encoded).unwrap();
/// assert_eq!(header.command_id, u32::from(Command::Request));
/// assert_eq!(header.payload_len, 9);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw command id (kept raw so unknown replies can be reported verbatim)
    pub command_id: u32,

    /// Payload without the NUL terminator
    pub payload: Bytes,
}

impl Frame {
    pub const HEADER_SIZE: usize = 16;

    /// Create a frame with no payload
    pub fn new(command: Command) -> Self {
        Self {
            command_id: command.into(),
            payload: Bytes::new(),
        }
    }

    /// Create a frame carrying `payload` (terminator added on encode)
    pub fn with_payload(command: Command, payload: impl Into<Bytes>) -> Self {
        Self {
            command_id: command.into(),
            payload: payload.into(),
        }
    }

    /// Value of the length field for this frame
    pub fn payload_len(&self) -> u32 {
        if self.payload.is_empty() {
            0
        } else {
            self.payload.len() as u32 + 1
        }
    }

    /// Encode header, payload and terminator
    pub fn encode(&self) -> BytesMut {
        let total_size = Self::HEADER_SIZE + self.payload_len() as usize;
        let mut buf = BytesMut::with_capacity(total_size);

        buf.put_slice(&MAGIC);
        buf.put_u32(self.command_id);
        buf.put_u32(self.payload_len());

        if !self.payload.is_empty() {
            buf.put_slice(&self.payload);
            buf.put_u8(0);
        }

        buf
    }

    /// Typed command id
    pub fn command(&self) -> Result<Command> {
        Command::try_from(self.command_id)
    }

    /// Total size on the wire
    pub fn size(&self) -> usize {
        Self::HEADER_SIZE + self.payload_len() as usize
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("command_id", &format!("0x{:08X}", self.command_id))
            .field("payload_len", &self.payload_len())
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command() {
            Ok(cmd) => write!(f, "Frame[{}](len={})", cmd, self.payload_len()),
            Err(_) => write!(
                f,
                "Frame[0x{:08X}](len={})",
                self.command_id,
                self.payload_len()
            ),
        }
    }
}

/// Decoded 16-byte frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub command_id: u32,

    /// Bytes following the header, terminator included
    pub payload_len: u32,
}

impl FrameHeader {
    /// Decode and validate a header
    ///
    /// # Errors
    ///
    /// - `HeaderTooShort` if fewer than 16 bytes are given
    /// - `BadMagic` if the first 8 bytes are not `DRINETTM`
    pub fn decode(mut buf: &[u8]) -> Result<Self> {
        if buf.len() < Frame::HEADER_SIZE {
            return Err(Error::HeaderTooShort {
                expected: Frame::HEADER_SIZE,
                actual: buf.len(),
            });
        }

        let mut magic = [0u8; 8];
        buf.copy_to_slice(&mut magic);
        if magic != MAGIC {
            return Err(Error::BadMagic { found: magic });
        }

        let command_id = buf.get_u32();
        let payload_len = buf.get_u32();

        Ok(Self {
            command_id,
            payload_len,
        })
    }

    /// Typed command id; `UnknownCommand` for ids outside the table
    pub fn command(&self) -> Result<Command> {
        Command::try_from(self.command_id)
    }

    /// Check the raw id against a known command
    pub fn is(&self, command: Command) -> bool {
        self.command_id == u32::from(command)
    }

    /// Check if this header is the valid reply to `request`
    pub fn answers(&self, request: Command) -> bool {
        request.expected_reply().is_some_and(|reply| self.is(reply))
    }
}

/// Drop one trailing NUL terminator, then trailing whitespace
///
pub fn trim_payload(payload: &[u8]) -> &[u8] {
    trim_trailing_whitespace(payload.strip_suffix(&[0u8]).unwrap_or(payload))
}

/// Drop trailing ASCII whitespace
pub fn trim_trailing_whitespace(body: &[u8]) -> &[u8] {
    let end = body
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &body[..end]
}
