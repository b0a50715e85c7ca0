//! Error types for drobo-core

/// Result type alias for drobo-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Header is shorter than the fixed 16 bytes
    #[error("Header too short: expected {expected} bytes, got {actual} bytes")]
    HeaderTooShort {
        expected: usize,
        actual: usize,
    },

    /// First 8 bytes are not `DRINETTM`
    #[error("bad magic: {}", hex::encode(found))]
    BadMagic {
        found: [u8; 8],
    },

    /// Command id outside the known set
    #[error("Unknown command id: 0x{0:08X}")]
    UnknownCommand(u32),

    #[error("ESA id is {len} bytes, at most {max} fit in the handshake")]
    EsaIdTooLong {
        len: usize,
        max: usize,
    },

    #[error("ESA id must be ASCII")]
    EsaIdNotAscii,

    /// XML reader/writer failure
    #[error("XML error: {0}")]
    Xml(String),

    /// Well-formed bytes that do not make up a single-rooted document
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },

    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),

    /// Document parsed but does not match the expected record
    #[error("Document error: {0}")]
    Types(#[from] drobo_types::Error),
}

impl Error {
    /// Malformed or out-of-protocol input from the device
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::HeaderTooShort { .. }
                | Self::BadMagic { .. }
                | Self::UnknownCommand(_)
                | Self::Xml(_)
                | Self::MalformedDocument(_)
                | Self::PayloadTooLarge { .. }
                | Self::Types(_)
        )
    }
}
