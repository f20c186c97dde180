//! Checksummed byte framing for the Alpha 1S control link.
//!
//! This is the leaf layer of alphalink: pure encode/validate logic over
//! byte slices, no I/O. Every command and reply travels as:
//! - A 2-byte header (`0xFB 0xBF`) for stream synchronization
//! - A 1-byte length field covering itself, the payload and the checksum
//! - The payload (command byte plus parameters)
//! - A 1-byte modulo-256 checksum over length and payload
//! - A 1-byte trailer (`0xED`)
//!
//! A frame is well-formed only if all structural checks pass; a corrupted
//! frame is a routine decode error, never a panic.

pub mod codec;
pub mod error;

pub use codec::{decode_frame, encode_frame, frame_size, HEADER, MAX_PAYLOAD, OVERHEAD, TRAILER};
pub use error::{FrameError, Result};
