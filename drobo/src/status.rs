//! Status channel
//!
//! The device pushes exactly one status document when a client connects to
//! the status port. It is read and parsed once during construction and
//! cached; there is no polling.

use byteorder::{BigEndian, ByteOrder};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use drobo_core::constants::STATUS_PREFIX_SIZE;
use drobo_core::{trim_trailing_whitespace, xml};
use drobo_transport::Transport;
use drobo_types::StatusRecord;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Connection to the status port holding the parsed status
///
/// # Examples
///
/// ```no_run
/// use drobo::{ClientConfig, StatusChannel};
///
/// #[tokio::main]
/// async fn main() -> drobo::Result<()> {
///     let config = ClientConfig::new("192.168.1.50");
///     let channel = StatusChannel::connect(&config).await?;
///
///     let status = channel.status();
///     println!("{} has {} slots", status.name, status.slot_count);
///     Ok(())
/// }
/// ```
pub struct StatusChannel {
    transport: Box<dyn Transport>,
    status: StatusRecord,
    received_at: DateTime<Utc>,
}

impl StatusChannel {
    /// Connect to the status port and read the pushed status
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let transport = Box::new(config.status_transport());
        Self::with_transport(transport, config).await
    }

    /// Read the status over a caller-supplied transport
    ///
    /// The transport is connected first unless it already is. On any error
    /// the transport is disconnected and no channel is returned.
    pub async fn with_transport(
        mut transport: Box<dyn Transport>,
        config: &ClientConfig,
    ) -> Result<Self> {
        info!("Reading status from {}...", transport.remote_addr());

        if !transport.is_connected() {
            transport.connect().await?;
        }

        let status = match read_status(transport.as_mut(), config.max_payload_len).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Status read failed: {}", e);
                let _ = transport.disconnect().await;
                return Err(e);
            }
        };

        info!("Status received: {}", status);

        Ok(Self {
            transport,
            status,
            received_at: Utc::now(),
        })
    }

    /// Cached status; never touches the socket
    pub fn status(&self) -> &StatusRecord {
        &self.status
    }

    /// ESA id reported by the device, needed for the command handshake
    pub fn esa_id(&self) -> &str {
        &self.status.esa_id
    }

    /// When the status block was read
    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Check if the status socket is still open
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Close the connection, keeping the cached status readable
    pub async fn disconnect(&mut self) -> Result<()> {
        self.transport.disconnect().await?;
        Ok(())
    }

    /// Close the connection and hand back the status
    pub async fn into_status(mut self) -> StatusRecord {
        if let Err(e) = self.transport.disconnect().await {
            warn!("Failed to close status connection: {}", e);
        }
        self.status
    }
}

async fn read_status<T: Transport + ?Sized>(
    transport: &mut T,
    max_len: usize,
) -> Result<StatusRecord> {
    let prefix = transport.recv_exact(STATUS_PREFIX_SIZE).await?;
    let block_len = BigEndian::read_i32(&prefix[STATUS_PREFIX_SIZE - 4..]);

    let len = usize::try_from(block_len)
        .ok()
        .filter(|len| (1..=max_len).contains(len))
        .ok_or(Error::BadBlockLength(block_len))?;

    debug!("Status block is {} bytes", len);

    let block = transport.recv_exact(len).await?;
    let root = xml::parse_element(status_body(&block))?;

    Ok(StatusRecord::from_element(&root)?)
}

/// Drop the final (terminator) byte of a status block and trailing whitespace
fn status_body(block: &[u8]) -> &[u8] {
    trim_trailing_whitespace(&block[..block.len().saturating_sub(1)])
}
