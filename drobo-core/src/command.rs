//! Frame-level command ids and configuration section names

use std::fmt;

use crate::error::{Error, Result};

/// Frame command ids
///
/// Replies set the high bit of the request id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Command {
    /// Client hello carrying the padded ESA id
    Handshake = 0x0701_0000,
    HandshakeAck = 0x8701_0000,

    /// XML command request
    Request = 0x0a01_0000,
    Response = 0x8a01_0000,
}

impl Command {
    const REPLY_BIT: u32 = 0x8000_0000;

    /// Check if this id is sent by the client
    pub fn is_request(self) -> bool {
        !self.is_response()
    }

    /// Check if this id is sent by the device
    pub fn is_response(self) -> bool {
        u32::from(self) & Self::REPLY_BIT != 0
    }

    /// The only reply id the device may answer this request with
    pub fn expected_reply(self) -> Option<Command> {
        match self {
            Self::Handshake => Some(Self::HandshakeAck),
            Self::Request => Some(Self::Response),
            Self::HandshakeAck | Self::Response => None,
        }
    }

    /// Command name for logs
    pub fn name(self) -> &'static str {
        match self {
            Self::Handshake => "HANDSHAKE",
            Self::HandshakeAck => "HANDSHAKE_ACK",
            Self::Request => "REQUEST",
            Self::Response => "RESPONSE",
        }
    }
}

impl From<Command> for u32 {
    fn from(cmd: Command) -> u32 {
        cmd as u32
    }
}

impl TryFrom<u32> for Command {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0x0701_0000 => Ok(Self::Handshake),
            0x8701_0000 => Ok(Self::HandshakeAck),
            0x0a01_0000 => Ok(Self::Request),
            0x8a01_0000 => Ok(Self::Response),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:08X})", self.name(), *self as u32)
    }
}

/// Named configuration sections readable with `CmdID` 30
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConfigType {
    Network,
    Shares,
    Admin,
}

impl ConfigType {
    /// Key sent in `Params`, spelled exactly as the firmware expects
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "Network",
            Self::Shares => "DRIShareConfig",
            Self::Admin => "DRINasAdminCofnig",
        }
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
