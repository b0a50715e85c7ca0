//! Command-channel handshake payload
//!
//! The firmware expects a fixed 220-byte layout carrying the ESA id twice.
//! Any other length is rejected by the device.

use bytes::{BufMut, Bytes, BytesMut};

use crate::constants::handshake::{ESA_FIELD_WIDTH, PAYLOAD_LEN};
use crate::error::{Error, Result};

/// Build the handshake payload for `esa_id`
///
/// # Layout
///
/// ```text
/// ┌──────────┬──────────────┬──────────┬─────────────────────────────┐
/// │  esa_id  │  20-k zeros  │  esa_id  │  220-(20-k)-2k zeros        │
/// │ k bytes  │              │ k bytes  │                             │
/// └──────────┴──────────────┴──────────┴─────────────────────────────┘
/// ```
///
/// # Errors
///
/// `EsaIdNotAscii` for non-ASCII ids, `EsaIdTooLong` when `k > 20`.
///
/// # Examples
///
/// ```
/// use drobo_core::handshake;
///
/// let payload = handshake::make_payload("ABC123").unwrap();
/// assert_eq!(payload.len(), 220);
/// assert_eq!(&payload[20..26], b"ABC123");
/// ```
pub fn make_payload(esa_id: &str) -> Result<Bytes> {
    if !esa_id.is_ascii() {
        return Err(Error::EsaIdNotAscii);
    }

    let id = esa_id.as_bytes();
    let k = id.len();
    if k > ESA_FIELD_WIDTH {
        return Err(Error::EsaIdTooLong {
            len: k,
            max: ESA_FIELD_WIDTH,
        });
    }

    let mid_pad = ESA_FIELD_WIDTH - k;
    let back_pad = PAYLOAD_LEN - mid_pad - 2 * k;

    let mut buf = BytesMut::with_capacity(PAYLOAD_LEN);
    buf.put_slice(id);
    buf.put_bytes(0, mid_pad);
    buf.put_slice(id);
    buf.put_bytes(0, back_pad);

    Ok(buf.freeze())
}
