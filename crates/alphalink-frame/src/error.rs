/// Errors that can occur during frame encoding/decoding.
///
/// Decode-side variants describe which structural check failed. On a noisy
/// wireless link these are expected, recoverable outcomes.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload does not fit the single-byte length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Fewer bytes than the smallest possible frame.
    #[error("frame too short ({len} bytes)")]
    TooShort { len: usize },

    /// The frame does not start with the `0xFB 0xBF` header.
    #[error("invalid frame header (expected 0xFB 0xBF)")]
    BadHeader,

    /// The frame does not end with the `0xED` trailer.
    #[error("invalid frame trailer (expected 0xED)")]
    BadTrailer,

    /// The length byte disagrees with the number of bytes received.
    #[error("length byte claims {declared} bytes, frame carries {actual}")]
    LengthMismatch { declared: u8, actual: usize },

    /// The checksum byte does not match the recomputed sum.
    #[error("checksum mismatch (computed {computed:#04x}, received {received:#04x})")]
    ChecksumMismatch { computed: u8, received: u8 },
}

pub type Result<T> = std::result::Result<T, FrameError>;
