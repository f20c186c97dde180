use std::time::Duration;

use clap::{Args, Subcommand};

use alphalink_proto::Alpha1s;
use alphalink_transport::{BdAddr, IoChannel, LinkStream, DEFAULT_RFCOMM_CHANNEL};

use crate::exit::{channel_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod battery;
pub mod off;
pub mod read;
pub mod read_all;
pub mod write;
pub mod write_all;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query battery voltage, charge state and remaining capacity.
    Battery(BatteryArgs),
    /// Read one servo's position. Reading powers off that servo's torque.
    Read(ReadArgs),
    /// Read all 16 servo positions. Reading powers off their torque.
    ReadAll(ReadAllArgs),
    /// Move one servo to an angle.
    Write(WriteArgs),
    /// Move all 16 servos at once.
    WriteAll(WriteAllArgs),
    /// Power off all servos.
    Off(OffArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Battery(args) => battery::run(args, format),
        Command::Read(args) => read::run(args, format),
        Command::ReadAll(args) => read_all::run(args, format),
        Command::Write(args) => write::run(args, format),
        Command::WriteAll(args) => write_all::run(args, format),
        Command::Off(args) => off::run(args),
    }
}

/// Connection arguments shared by every subcommand.
#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Robot Bluetooth address (AA:BB:CC:DD:EE:FF).
    #[arg(long, value_name = "BDADDR")]
    pub addr: String,

    /// RFCOMM channel of the robot's serial service.
    #[arg(long, default_value_t = DEFAULT_RFCOMM_CHANNEL)]
    pub channel: u8,

    /// Read/write timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "10s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct BatteryArgs {
    #[command(flatten)]
    pub link: LinkArgs,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    #[command(flatten)]
    pub link: LinkArgs,
    /// Servo id (0-15).
    pub id: u8,
}

#[derive(Args, Debug)]
pub struct ReadAllArgs {
    #[command(flatten)]
    pub link: LinkArgs,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    #[command(flatten)]
    pub link: LinkArgs,
    /// Servo id (0-15).
    pub id: u8,
    /// Target angle in degrees (0-180).
    pub angle: u8,
    /// Travel time for the move.
    #[arg(long, default_value_t = alphalink_proto::DEFAULT_TRAVEL)]
    pub travel: u8,
}

#[derive(Args, Debug)]
pub struct WriteAllArgs {
    #[command(flatten)]
    pub link: LinkArgs,
    /// 16 target angles in degrees (0-180), comma- or space-separated.
    #[arg(value_delimiter = ',', num_args = 1..)]
    pub angles: Vec<u8>,
    /// Travel time for the move.
    #[arg(long, default_value_t = alphalink_proto::DEFAULT_TRAVEL)]
    pub travel: u8,
}

#[derive(Args, Debug)]
pub struct OffArgs {
    #[command(flatten)]
    pub link: LinkArgs,
}

pub type Robot = Alpha1s<IoChannel<LinkStream>>;

/// Resolve the link arguments and open the RFCOMM connection.
pub fn connect(link: &LinkArgs) -> CliResult<Robot> {
    let addr: BdAddr = link
        .addr
        .parse()
        .map_err(|err| CliError::new(USAGE, format!("{err}")))?;
    let timeout = parse_duration(&link.timeout)?;
    let stream = LinkStream::connect_with(addr, link.channel, timeout)
        .map_err(|err| channel_error("connect failed", err))?;
    Ok(Alpha1s::new(IoChannel::new(stream)))
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }
}
