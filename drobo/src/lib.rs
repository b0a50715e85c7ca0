//! # drobo
//!
//! Rust client for the Drobo NAS status and command protocol.
//!
//! ## Features
//!
//! - Status channel: the parsed device status pushed on connect
//! - Command channel: handshake plus read-only configuration requests
//! - Async/await API using Tokio, with per-operation deadlines
//! - Typed errors distinguishing connection, protocol and handshake failures
//!
//! ## Quick Start
//!
//! ```no_run
//! use drobo::{ClientConfig, CommandChannel, StatusChannel};
//!
//! #[tokio::main]
//! async fn main() -> drobo::Result<()> {
//!     let config = ClientConfig::new("192.168.1.50");
//!
//!     // Device identity and live status
//!     let status = StatusChannel::connect(&config).await?.into_status().await;
//!     println!("{}", status);
//!
//!     // Configuration reads need the ESA id from the status
//!     let mut commands = CommandChannel::connect(&config, status.esa_id.clone()).await?;
//!     let network = commands.network_config().await?;
//!     println!("{} at {}", network.nas_name, network.ip.ip);
//!
//!     commands.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod status;

// Re-exports
pub use command::CommandChannel;
pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Result};
pub use status::StatusChannel;

// Re-export types
pub use drobo_core::{Command, ConfigType, Frame, FrameHeader, RequestBuilder, Session, Value};
pub use drobo_transport::{TcpTransport, Transport};
pub use drobo_types::{
    ConfigDocument, DeviceState, DeviceStatus, DiskStatus, DiskType, IpConfig, IpConfigType,
    JumboFrames, NetworkConfig, Share, SlotRecord, StatusFlags, StatusRecord, XmlElement,
};
