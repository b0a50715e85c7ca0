//! High-level error types

use bytes::Bytes;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] drobo_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] drobo_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] drobo_types::Error),

    /// Handshake reply had the wrong command id or carried a payload
    #[error("Handshake rejected: reply 0x{command_id:08X} with payload length {payload_len}")]
    Handshake {
        command_id: u32,
        payload_len: u32,
    },

    /// Command reply with a command id other than the expected one
    #[error("Unexpected response 0x{command_id:08X} (payload length {payload_len})")]
    UnexpectedResponse {
        command_id: u32,

        /// Length field from the reply header
        payload_len: u32,

        /// Raw payload as read from the wire; empty when `payload_len`
        /// exceeds the configured limit
        payload: Bytes,
    },

    /// Status block length outside `1..=max`
    #[error("Invalid status block length: {0}")]
    BadBlockLength(i32),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure classes callers are expected to tell apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// TCP connection could not be established or broke
    Connection,

    /// Peer closed before the expected bytes were delivered
    ConnectionClosed,

    /// A connect, read or write deadline expired
    Timeout,

    /// Bad magic, malformed XML, bad lengths, unexpected document shape
    Protocol,

    Handshake,

    UnexpectedResponse,

    /// Channel used before the handshake completed or after a failure
    NotReady,

    /// Rejected before any I/O (bad ESA id, bad configuration)
    InvalidInput,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        use drobo_core::Error as Core;
        use drobo_transport::Error as Transport;

        match self {
            Self::Transport(Transport::ConnectionClosed { .. }) => ErrorKind::ConnectionClosed,
            Self::Transport(e) if e.is_timeout() => ErrorKind::Timeout,
            Self::Transport(_) => ErrorKind::Connection,
            Self::Core(e) if e.is_protocol_error() => ErrorKind::Protocol,
            Self::Core(Core::InvalidSessionState(_)) => ErrorKind::NotReady,
            Self::Core(_) => ErrorKind::InvalidInput,
            Self::Types(_) | Self::BadBlockLength(_) => ErrorKind::Protocol,
            Self::Handshake { .. } => ErrorKind::Handshake,
            Self::UnexpectedResponse { .. } => ErrorKind::UnexpectedResponse,
            Self::Config(_) => ErrorKind::InvalidInput,
        }
    }

    /// The channel that produced this error is unusable; open a new one
    pub fn requires_reconnect(&self) -> bool {
        !matches!(self.kind(), ErrorKind::InvalidInput)
    }
}
