//! Transport layer for the Drobo protocol
//!
//! Provides exact-length reads and writes over TCP.

pub mod error;
pub mod tcp;

pub use error::{Error, Result};
pub use tcp::TcpTransport;

use async_trait::async_trait;
use bytes::BytesMut;

/// Byte-stream transport with exact-length semantics
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to device
    async fn connect(&mut self) -> Result<()>;

    /// Disconnect from device
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Write the whole buffer
    async fn send_exact(&mut self, data: &[u8]) -> Result<()>;

    /// Read exactly `len` bytes, failing with `ConnectionClosed` on early EOF
    async fn recv_exact(&mut self, len: usize) -> Result<BytesMut>;

    /// Get remote address
    fn remote_addr(&self) -> String;
}
