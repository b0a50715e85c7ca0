//! Command channel
//!
//! Request/response channel on the command port. A handshake carrying the
//! device's ESA id must succeed before any request is sent. One request is
//! in flight at a time; every method takes `&mut self`.

use bytes::Bytes;
use tracing::{debug, info, trace, warn};

use drobo_core::constants::cmd;
use drobo_core::{
    Command, ConfigType, Frame, FrameHeader, RequestBuilder, Session, handshake, trim_payload, xml,
};
use drobo_transport::Transport;
use drobo_types::{ConfigDocument, NetworkConfig, Share};

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Handshaken connection to the command port
///
/// # Examples
///
/// ```no_run
/// use drobo::{ClientConfig, CommandChannel, StatusChannel};
///
/// #[tokio::main]
/// async fn main() -> drobo::Result<()> {
///     let config = ClientConfig::new("192.168.1.50");
///
///     // The handshake needs the ESA id reported on the status port
///     let esa_id = StatusChannel::connect(&config).await?.into_status().await.esa_id;
///
///     let mut channel = CommandChannel::connect(&config, esa_id).await?;
///     for share in channel.shares().await? {
///         println!("{} (Time Machine: {})", share.name, share.time_machine_enabled);
///     }
///
///     channel.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct CommandChannel {
    transport: Box<dyn Transport>,
    session: Session,
    max_payload_len: usize,
}

impl CommandChannel {
    /// Connect to the command port and perform the handshake
    pub async fn connect(config: &ClientConfig, esa_id: impl Into<String>) -> Result<Self> {
        let transport = Box::new(config.command_transport());
        Self::with_transport(transport, esa_id, config).await
    }

    /// Perform the handshake over a caller-supplied transport
    ///
    /// # Errors
    ///
    /// - `EsaIdTooLong` / `EsaIdNotAscii` before any I/O
    /// - transport errors while connecting or exchanging the handshake
    /// - `Handshake` if the reply is not an empty `HandshakeAck`
    pub async fn with_transport(
        transport: Box<dyn Transport>,
        esa_id: impl Into<String>,
        config: &ClientConfig,
    ) -> Result<Self> {
        let esa_id = esa_id.into();
        let payload = handshake::make_payload(&esa_id)?;

        let mut channel = Self {
            transport,
            session: Session::new(esa_id),
            max_payload_len: config.max_payload_len,
        };

        if let Err(e) = channel.handshake(payload).await {
            warn!("Handshake with {} failed: {}", channel.transport.remote_addr(), e);
            channel.session.fail();
            let _ = channel.transport.disconnect().await;
            return Err(e);
        }

        Ok(channel)
    }

    /// ESA id sent in the handshake and every request
    pub fn esa_id(&self) -> &str {
        self.session.esa_id()
    }

    /// Session state and request counter
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Check if the handshake completed and no request has failed since
    pub fn is_ready(&self) -> bool {
        self.session.is_ready() && self.transport.is_connected()
    }

    /// Send a bare command (`CmdID` and `ESAID` only)
    pub async fn request(&mut self, cmd_id: u32) -> Result<ConfigDocument> {
        self.exchange(cmd_id, None).await
    }

    /// Read a named configuration section
    pub async fn get_config(&mut self, config_type: &str) -> Result<ConfigDocument> {
        self.exchange(cmd::GET_CONFIG, Some(config_type)).await
    }

    /// Raw `Network` section
    pub async fn get_network_config(&mut self) -> Result<ConfigDocument> {
        self.get_config(ConfigType::Network.as_str()).await
    }

    /// Raw `DRIShareConfig` section
    pub async fn get_share_config(&mut self) -> Result<ConfigDocument> {
        self.get_config(ConfigType::Shares.as_str()).await
    }

    /// Raw admin section
    pub async fn get_admin_config(&mut self) -> Result<ConfigDocument> {
        self.get_config(ConfigType::Admin.as_str()).await
    }

    /// Network configuration as a typed record
    pub async fn network_config(&mut self) -> Result<NetworkConfig> {
        let doc = self.get_network_config().await?;
        Ok(NetworkConfig::from_document(&doc)?)
    }

    /// Configured shares in device order
    pub async fn shares(&mut self) -> Result<Vec<Share>> {
        let doc = self.get_share_config().await?;
        Ok(Share::list_from_document(&doc)?)
    }

    /// Disconnect from device
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.transport.is_connected() {
            return Ok(());
        }

        info!("Disconnecting from {}...", self.transport.remote_addr());

        self.transport.disconnect().await?;
        self.session.close();

        Ok(())
    }

    // Helper methods

    async fn handshake(&mut self, payload: Bytes) -> Result<()> {
        info!("Connecting to {}...", self.transport.remote_addr());

        if !self.transport.is_connected() {
            self.transport.connect().await?;
        }

        self.session.begin_handshake()?;
        self.send_frame(&Frame::with_payload(Command::Handshake, payload))
            .await?;

        let header = self.receive_header().await?;
        if !header.answers(Command::Handshake) || header.payload_len != 0 {
            return Err(Error::Handshake {
                command_id: header.command_id,
                payload_len: header.payload_len,
            });
        }

        self.session.complete_handshake()?;
        info!("Handshake complete (esa_id={})", self.session.esa_id());

        Ok(())
    }

    async fn exchange(&mut self, cmd_id: u32, config_type: Option<&str>) -> Result<ConfigDocument> {
        self.session.ensure_ready()?;

        let seq = self.session.next_request();
        debug!(
            "Request #{}: CmdID={} params={:?}",
            seq, cmd_id, config_type
        );

        match self.round_trip(cmd_id, config_type).await {
            Ok(doc) => {
                debug!("Request #{} answered: {}", seq, doc);
                Ok(doc)
            }
            Err(e) => {
                warn!("Request #{} failed: {}", seq, e);
                self.session.fail();
                Err(e)
            }
        }
    }

    async fn round_trip(&mut self, cmd_id: u32, config_type: Option<&str>) -> Result<ConfigDocument> {
        let body = RequestBuilder::command(cmd_id, config_type, self.session.esa_id())?;
        self.send_frame(&Frame::with_payload(Command::Request, body))
            .await?;

        let header = self.receive_header().await?;

        if !header.answers(Command::Request) {
            // Oversized bodies are left unread; the id is still reported
            let payload = if header.payload_len as usize > self.max_payload_len {
                Bytes::new()
            } else {
                self.receive_payload(header.payload_len).await?
            };
            return Err(Error::UnexpectedResponse {
                command_id: header.command_id,
                payload_len: header.payload_len,
                payload,
            });
        }

        let payload = self.receive_payload(header.payload_len).await?;
        Ok(xml::parse_document(trim_payload(&payload))?)
    }

    async fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        trace!("Sending: {:?}", frame);

        let data = frame.encode();
        self.transport.send_exact(&data).await?;

        Ok(())
    }

    async fn receive_header(&mut self) -> Result<FrameHeader> {
        let buf = self.transport.recv_exact(Frame::HEADER_SIZE).await?;

        let header = FrameHeader::decode(&buf)?;

        trace!("Received: {:?}", header);

        Ok(header)
    }

    async fn receive_payload(&mut self, payload_len: u32) -> Result<Bytes> {
        let len = payload_len as usize;
        if len == 0 {
            return Ok(Bytes::new());
        }

        if len > self.max_payload_len {
            return Err(drobo_core::Error::PayloadTooLarge {
                size: len,
                max: self.max_payload_len,
            }
            .into());
        }

        Ok(self.transport.recv_exact(len).await?.freeze())
    }
}
