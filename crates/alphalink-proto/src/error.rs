use alphalink_frame::FrameError;
use alphalink_transport::ChannelError;

/// Errors that can occur during a command round trip.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The reply frame failed a structural check.
    #[error("invalid reply frame: {0}")]
    Frame(#[from] FrameError),

    /// A single-servo reply echoed a different servo than the request
    /// addressed (wire ids, i.e. 1-indexed). Guards against a stale or
    /// misrouted reply being misread as this call's answer.
    #[error("reply echoed servo {got}, request addressed servo {expected}")]
    EchoMismatch { expected: u8, got: u8 },

    /// The underlying byte channel failed.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// The argument was rejected before any bytes were sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The reply frame was structurally valid but its contents were not
    /// interpretable (e.g. an unknown charge-state or status byte).
    #[error("malformed reply: {0}")]
    MalformedReply(&'static str),
}

impl ProtocolError {
    /// Whether this failure is a routine, retryable outcome of a noisy link.
    ///
    /// Frame corruption, echo mismatches, uninterpretable replies and read
    /// timeouts leave the channel usable for the next command. Other channel
    /// faults usually mean the connection needs re-establishing, and invalid
    /// arguments will not improve on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Frame(_) | Self::EchoMismatch { .. } | Self::MalformedReply(_) => true,
            Self::Channel(ChannelError::Timeout) => true,
            Self::Channel(_) | Self::InvalidArgument(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
