//! Type definitions for drobo
//!
//! Values produced by the protocol layer: the parsed status record pushed on
//! the status port, the generic XML tree returned by command requests, and
//! typed views over the known configuration documents.

pub mod config;
pub mod document;
pub mod error;
pub mod status;

pub use config::{IpConfig, IpConfigType, JumboFrames, NetworkConfig, Share};
pub use document::{ConfigDocument, XmlElement};
pub use error::{Error, Result};
pub use status::{
    DeviceState, DeviceStatus, DiskStatus, DiskType, SlotRecord, StatusFlags, StatusRecord,
};
