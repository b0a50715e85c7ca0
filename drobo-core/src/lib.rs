//! # drobo-core
//!
//! Core protocol implementation for the Drobo NAS control protocol.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - Command ids and configuration section names
//! - Handshake payload layout
//! - XML request building and reply parsing
//! - Command channel session state

pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod handshake;
pub mod request;
pub mod session;
pub mod xml;

pub use command::{Command, ConfigType};
pub use error::{Error, Result};
pub use frame::{Frame, FrameHeader, trim_payload, trim_trailing_whitespace};
pub use request::{RequestBuilder, Value};
pub use session::{Session, SessionState};
