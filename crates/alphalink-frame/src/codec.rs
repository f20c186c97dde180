use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header bytes.
pub const HEADER: [u8; 2] = [0xFB, 0xBF];

/// Frame trailer byte.
pub const TRAILER: u8 = 0xED;

/// Framing overhead: header (2) + length (1) + checksum (1) + trailer (1).
pub const OVERHEAD: usize = 5;

/// Maximum payload size. The length byte counts the payload plus itself and
/// the checksum, so the payload may be at most 255 - 2 bytes.
pub const MAX_PAYLOAD: usize = 253;

/// Total wire size of a frame carrying `payload_len` payload bytes.
///
/// Replies carry no delimiting beyond this framing, so callers size exact
/// reads from this, never from the length byte the device sends back.
pub const fn frame_size(payload_len: usize) -> usize {
    payload_len + OVERHEAD
}

/// Encode a payload into the wire format.
///
/// Wire format:
/// ```text
/// ┌─────────────┬──────────┬───────────────┬──────────┬─────────┐
/// │ Header (2B) │ Length   │ Payload       │ Checksum │ Trailer │
/// │ 0xFB 0xBF   │ (1B)     │ (Length - 2B) │ (1B)     │ 0xED    │
/// └─────────────┴──────────┴───────────────┴──────────┴─────────┘
/// ```
///
/// Length is `payload_len + 2` (it covers itself and the checksum byte).
/// Checksum is the modulo-256 sum of the length byte and the payload; the
/// header is excluded from the sum.
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    let length = (payload.len() + 2) as u8;
    dst.reserve(frame_size(payload.len()));
    dst.put_slice(&HEADER);
    dst.put_u8(length);
    dst.put_slice(payload);
    dst.put_u8(checksum(length, payload));
    dst.put_u8(TRAILER);
    Ok(())
}

/// Validate a complete frame and return its payload slice.
///
/// All four structural checks (header, trailer, length consistency,
/// checksum) must pass; the first failing check is reported. There is no
/// partial-validity state.
pub fn decode_frame(raw: &[u8]) -> Result<&[u8]> {
    if raw.len() < OVERHEAD {
        return Err(FrameError::TooShort { len: raw.len() });
    }
    if raw[0..2] != HEADER {
        return Err(FrameError::BadHeader);
    }
    if raw[raw.len() - 1] != TRAILER {
        return Err(FrameError::BadTrailer);
    }

    let length = raw[2];
    // Length counts itself, the payload and the checksum: raw minus the
    // header and trailer bytes.
    let actual = raw.len() - 3;
    if usize::from(length) != actual {
        return Err(FrameError::LengthMismatch {
            declared: length,
            actual,
        });
    }

    let payload = &raw[3..raw.len() - 2];
    let computed = checksum(length, payload);
    let received = raw[raw.len() - 2];
    if computed != received {
        return Err(FrameError::ChecksumMismatch { computed, received });
    }

    Ok(payload)
}

fn checksum(length: u8, payload: &[u8]) -> u8 {
    payload.iter().fold(length, |acc, b| acc.wrapping_add(*b))
}
