//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,

    #[error("Already connected")]
    AlreadyConnected,

    #[error("Connection timeout")]
    ConnectionTimeout,

    #[error("Read timeout")]
    ReadTimeout,

    #[error("Write timeout")]
    WriteTimeout,

    /// Peer closed the stream before the requested bytes arrived
    #[error("Connection closed by remote after {received} of {expected} bytes")]
    ConnectionClosed {
        expected: usize,
        received: usize,
    },

    #[error("Cannot connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

impl Error {
    /// Check if a deadline expired
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout | Self::ReadTimeout | Self::WriteTimeout
        )
    }
}
