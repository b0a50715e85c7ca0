//! TCP transport

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use drobo_core::constants::{
    CHUNK_SIZE, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, DEFAULT_WRITE_TIMEOUT,
};

use crate::{Transport, error::*};

/// Hex preview length for trace logging
const TRACE_PREVIEW: usize = 32;

/// TCP transport for Drobo devices
///
/// Each deadline bounds a whole operation: one connect, one `send_exact`,
/// one `recv_exact` however many chunks it takes. `None` waits indefinitely.
pub struct TcpTransport {
    addr: String,
    port: u16,
    socket_addr: Option<SocketAddr>,
    stream: Option<TcpStream>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl TcpTransport {
    /// Create new TCP transport
    pub fn new(addr: impl Into<String>, port: u16) -> Self {
        Self {
            addr: addr.into(),
            port,
            socket_addr: None,
            stream: None,
            connect_timeout: Some(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT)),
            read_timeout: Some(Duration::from_secs(DEFAULT_READ_TIMEOUT)),
            write_timeout: Some(Duration::from_secs(DEFAULT_WRITE_TIMEOUT)),
        }
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.connect_timeout = timeout.into();
        self
    }

    /// Set read timeout
    pub fn with_read_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.read_timeout = timeout.into();
        self
    }

    /// Set write timeout
    pub fn with_write_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.write_timeout = timeout.into();
        self
    }

    /// Resolve address to SocketAddr
    async fn resolve_addr(&mut self) -> Result<SocketAddr> {
        if let Some(addr) = self.socket_addr {
            return Ok(addr);
        }

        let addr_str = format!("{}:{}", self.addr, self.port);

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&addr_str)
            .await
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", addr_str, e)))?
            .collect();

        let addr = addrs
            .first()
            .ok_or_else(|| Error::InvalidAddress(format!("No addresses found for {}", addr_str)))?;

        self.socket_addr = Some(*addr);
        Ok(*addr)
    }
}

/// Run `fut` under an optional deadline
async fn deadline<F: Future>(limit: Option<Duration>, fut: F, on_timeout: Error) -> Result<F::Output> {
    match limit {
        Some(limit) => timeout(limit, fut).await.map_err(|_| on_timeout),
        None => Ok(fut.await),
    }
}

/// Accumulate exactly `len` bytes in chunks of at most `CHUNK_SIZE`
async fn read_full(stream: &mut TcpStream, len: usize) -> Result<BytesMut> {
    let mut buf = BytesMut::with_capacity(len);
    let mut chunk = [0u8; CHUNK_SIZE];

    while buf.len() < len {
        let want = (len - buf.len()).min(CHUNK_SIZE);
        let n = stream.read(&mut chunk[..want]).await?;

        if n == 0 {
            warn!("Connection closed after {} of {} bytes", buf.len(), len);
            return Err(Error::ConnectionClosed {
                expected: len,
                received: buf.len(),
            });
        }

        buf.extend_from_slice(&chunk[..n]);
    }

    Ok(buf)
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        let addr = self.resolve_addr().await?;

        debug!("Connecting to {}...", addr);

        let stream = deadline(
            self.connect_timeout,
            TcpStream::connect(addr),
            Error::ConnectionTimeout,
        )
        .await?
        .map_err(|source| Error::Connect {
            addr: addr.to_string(),
            source,
        })?;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        debug!("Connected to {}", addr);

        self.stream = Some(stream);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!("Disconnecting from {}...", self.remote_addr());

            // Graceful shutdown
            let _ = stream.shutdown().await;
        }

        self.socket_addr = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send_exact(&mut self, data: &[u8]) -> Result<()> {
        let write_timeout = self.write_timeout;
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!(
            "Sending {} bytes: {}",
            data.len(),
            hex::encode(&data[..data.len().min(TRACE_PREVIEW)])
        );

        deadline(
            write_timeout,
            async {
                stream.write_all(data).await?;
                stream.flush().await
            },
            Error::WriteTimeout,
        )
        .await??;

        Ok(())
    }

    async fn recv_exact(&mut self, len: usize) -> Result<BytesMut> {
        let read_timeout = self.read_timeout;
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        let buf = deadline(read_timeout, read_full(stream, len), Error::ReadTimeout).await??;

        trace!(
            "Received {} bytes: {}",
            len,
            hex::encode(&buf[..len.min(TRACE_PREVIEW)])
        );

        Ok(buf)
    }

    fn remote_addr(&self) -> String {
        self.socket_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| format!("{}:{}", self.addr, self.port))
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            warn!("TCP transport dropped while still connected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn listener() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[tokio::test]
    async fn test_tcp_transport_create() {
        let transport = TcpTransport::new("192.168.1.201", 5001);
        assert!(!transport.is_connected());
        assert_eq!(transport.remote_addr(), "192.168.1.201:5001");
    }

    #[tokio::test]
    async fn test_tcp_transport_invalid_address() {
        let mut transport = TcpTransport::new("invalid..address", 5001)
            .with_connect_timeout(Duration::from_millis(100));

        let result = transport.connect().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let (listener, port) = listener().await;
        drop(listener);

        let mut transport = TcpTransport::new("127.0.0.1", port);
        let result = transport.connect().await;
        assert!(matches!(result, Err(Error::Connect { .. })));
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_io_before_connect() {
        let mut transport = TcpTransport::new("127.0.0.1", 1);
        assert!(matches!(transport.recv_exact(4).await, Err(Error::NotConnected)));
        assert!(matches!(transport.send_exact(b"x").await, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_recv_exact_across_partial_writes() {
        let (listener, port) = listener().await;

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            for part in [&b"DRI"[..], &b"NE"[..], &b"TTM"[..]] {
                socket.write_all(part).await.unwrap();
                socket.flush().await.unwrap();
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            socket.write_all(b"tail").await.unwrap();
        });

        let mut transport = TcpTransport::new("127.0.0.1", port);
        transport.connect().await.unwrap();

        let first = transport.recv_exact(8).await.unwrap();
        assert_eq!(&first[..], b"DRINETTM");
        let rest = transport.recv_exact(4).await.unwrap();
        assert_eq!(&rest[..], b"tail");

        server.await.unwrap();
        transport.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_recv_exact_larger_than_chunk() {
        let (listener, port) = listener().await;
        let payload: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        let expected = payload.clone();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(&payload).await.unwrap();
        });

        let mut transport = TcpTransport::new("127.0.0.1", port);
        transport.connect().await.unwrap();

        let data = transport.recv_exact(5000).await.unwrap();
        assert_eq!(&data[..], &expected[..]);

        server.await.unwrap();
        transport.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_recv_exact_early_close() {
        let (listener, port) = listener().await;

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"abc").await.unwrap();
        });

        let mut transport = TcpTransport::new("127.0.0.1", port);
        transport.connect().await.unwrap();
        server.await.unwrap();

        let result = transport.recv_exact(8).await;
        assert!(matches!(
            result,
            Err(Error::ConnectionClosed {
                expected: 8,
                received: 3
            })
        ));
        transport.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_read_timeout() {
        let (listener, port) = listener().await;

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            drop(socket);
        });

        let mut transport =
            TcpTransport::new("127.0.0.1", port).with_read_timeout(Duration::from_millis(50));
        transport.connect().await.unwrap();

        let result = transport.recv_exact(1).await;
        assert!(matches!(result, Err(Error::ReadTimeout)));
        assert!(result.unwrap_err().is_timeout());

        transport.disconnect().await.unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_read_timeout_covers_whole_read() {
        let (listener, port) = listener().await;

        // One byte every 60ms keeps each chunk inside the deadline
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            for _ in 0..30 {
                if socket.write_all(b"x").await.is_err() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(60)).await;
            }
        });

        let mut transport =
            TcpTransport::new("127.0.0.1", port).with_read_timeout(Duration::from_millis(100));
        transport.connect().await.unwrap();

        let started = std::time::Instant::now();
        let result = transport.recv_exact(30).await;
        assert!(matches!(result, Err(Error::ReadTimeout)));
        assert!(started.elapsed() < Duration::from_millis(1000));

        transport.disconnect().await.unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_exact() {
        let (listener, port) = listener().await;

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 5];
            socket.read_exact(&mut buf).await.unwrap();
            buf
        });

        let mut transport = TcpTransport::new("127.0.0.1", port);
        transport.connect().await.unwrap();
        transport.send_exact(b"hello").await.unwrap();

        assert_eq!(&server.await.unwrap(), b"hello");
        transport.disconnect().await.unwrap();
    }
}
