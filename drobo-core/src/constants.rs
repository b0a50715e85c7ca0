//! Protocol constants

/// Frame magic, first 8 bytes of every command-port frame
pub const MAGIC: [u8; 8] = *b"DRINETTM";

/// Status port (server pushes one status document on connect)
pub const STATUS_PORT: u16 = 5000;

/// Command port (handshake, then request/response)
pub const COMMAND_PORT: u16 = 5001;

/// Size of the initial message preceding the status block
pub const STATUS_PREFIX_SIZE: usize = 16;

/// Largest single read issued against the socket
pub const CHUNK_SIZE: usize = 2048;

/// Default connection timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 5;

/// Default read timeout (seconds)
pub const DEFAULT_READ_TIMEOUT: u64 = 30;

/// Default write timeout (seconds)
pub const DEFAULT_WRITE_TIMEOUT: u64 = 10;

/// Upper bound accepted for a single reply payload or status block
pub const DEFAULT_MAX_PAYLOAD_LEN: usize = 16 * 1024 * 1024;

/// Handshake payload layout
pub mod handshake {
    /// Total handshake payload size
    pub const PAYLOAD_LEN: usize = 220;

    /// Width of the first (padded) ESA id field
    pub const ESA_FIELD_WIDTH: usize = 20;
}

/// Values carried inside the XML request body
pub mod cmd {
    /// Root element of every request and reply document
    pub const ROOT: &str = "TMCmd";

    /// `CmdID` used to read a named configuration section
    pub const GET_CONFIG: u32 = 30;
}
