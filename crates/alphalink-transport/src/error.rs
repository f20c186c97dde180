/// Errors that can occur on the byte channel to the robot.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Failed to open the RFCOMM connection.
    #[error("failed to connect to {addr} on rfcomm channel {channel}: {source}")]
    Connect {
        addr: String,
        channel: u8,
        source: std::io::Error,
    },

    /// An I/O error occurred on the link.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No reply arrived within the channel's configured timeout.
    ///
    /// The link itself remains usable for the next command.
    #[error("read timed out waiting for reply")]
    Timeout,

    /// The link closed mid-message (short read or zero-length write).
    #[error("link closed before the message completed")]
    Closed,

    /// The device address string could not be parsed.
    #[error("invalid device address {addr:?}: {reason}")]
    BadAddress { addr: String, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, ChannelError>;
