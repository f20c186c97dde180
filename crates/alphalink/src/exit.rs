use std::fmt;

use alphalink_proto::ProtocolError;
use alphalink_transport::ChannelError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const LINK_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn channel_error(context: &str, err: ChannelError) -> CliError {
    let code = match &err {
        ChannelError::Timeout => TIMEOUT,
        ChannelError::BadAddress { .. } => USAGE,
        ChannelError::Connect { .. } | ChannelError::Closed => FAILURE,
        ChannelError::Io(_) => LINK_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn proto_error(context: &str, err: ProtocolError) -> CliError {
    match err {
        ProtocolError::Channel(err) => channel_error(context, err),
        ProtocolError::InvalidArgument(_) => CliError::new(USAGE, format!("{context}: {err}")),
        ProtocolError::Frame(_)
        | ProtocolError::EchoMismatch { .. }
        | ProtocolError::MalformedReply(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}
