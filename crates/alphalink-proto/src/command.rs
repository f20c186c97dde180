//! Request payloads, reply layouts and result types for each robot
//! operation.
//!
//! The wire format is fixed: every request payload is the opcode byte
//! followed by its parameters, and every reply payload is the echoed
//! command byte followed by the result bytes. Reply lengths are known in
//! advance per operation; the channel has no message delimiting beyond the
//! framing, so the caller must size each read from these constants.

use crate::error::{ProtocolError, Result};

/// Opcode: battery diagnostics query.
pub const OP_BATTERY: u8 = 0x18;
/// Opcode: single servo write.
pub const OP_SERVO_WRITE: u8 = 0x22;
/// Opcode: bulk servo write.
pub const OP_SERVO_WRITE_ALL: u8 = 0x23;
/// Opcode: single servo read.
pub const OP_SERVO_READ: u8 = 0x24;
/// Opcode: bulk servo read.
pub const OP_SERVO_READ_ALL: u8 = 0x25;
/// Opcode: power off all servos.
pub const OP_SERVOS_OFF: u8 = 0x0C;

/// Number of servos in the robot.
pub const SERVO_COUNT: usize = 16;

/// Default travel time for write commands.
pub const DEFAULT_TRAVEL: u8 = 20;

/// Trailing time-frame bytes carried by every write command.
const TIME_FRAMES: [u8; 2] = [0x00, 0x10];

/// Reply parameter bytes for a battery query.
pub const BATTERY_REPLY_LEN: usize = 4;
/// Reply parameter bytes for a single-servo read or write.
pub const SERVO_REPLY_LEN: usize = 2;
/// Reply parameter bytes for a bulk read or write.
pub const ALL_SERVOS_REPLY_LEN: usize = SERVO_COUNT;

/// A servo index, 0 to 15 on the public interface.
///
/// The robot numbers servos from 1 on the wire; the offset is applied when
/// building payloads and undone when checking reply echoes, never exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoId(u8);

impl ServoId {
    /// Highest valid servo index.
    pub const MAX: u8 = SERVO_COUNT as u8 - 1;

    pub fn new(index: u8) -> Result<Self> {
        if index > Self::MAX {
            return Err(ProtocolError::InvalidArgument(format!(
                "servo id {index} out of range 0-{}",
                Self::MAX
            )));
        }
        Ok(Self(index))
    }

    /// The zero-based index.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// The 1-indexed id used on the wire.
    pub(crate) const fn wire(self) -> u8 {
        self.0 + 1
    }
}

impl TryFrom<u8> for ServoId {
    type Error = ProtocolError;

    fn try_from(index: u8) -> Result<Self> {
        Self::new(index)
    }
}

/// A servo angle, 0 to 180 degrees, one byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Angle(u8);

impl Angle {
    /// Highest valid angle.
    pub const MAX: u8 = 180;

    pub fn new(degrees: u8) -> Result<Self> {
        if degrees > Self::MAX {
            return Err(ProtocolError::InvalidArgument(format!(
                "angle {degrees} out of range 0-{}",
                Self::MAX
            )));
        }
        Ok(Self(degrees))
    }

    pub const fn degrees(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Angle {
    type Error = ProtocolError;

    fn try_from(degrees: u8) -> Result<Self> {
        Self::new(degrees)
    }
}

/// Battery charging state, byte 2 of the battery reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeState {
    NotCharging,
    Charging,
    /// No battery present.
    Absent,
}

impl ChargeState {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::NotCharging),
            1 => Some(Self::Charging),
            2 => Some(Self::Absent),
            _ => None,
        }
    }
}

/// Battery diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryStatus {
    /// Battery voltage in millivolts.
    pub millivolts: u16,
    /// Charging state.
    pub state: ChargeState,
    /// Remaining capacity, percent.
    pub percent: u8,
}

/// Per-servo status code returned by write commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// The servo accepted the command.
    Ok,
    /// The servo id was not recognized.
    WrongId,
    /// The requested angle exceeded the servo's allowed range.
    AngleExcess,
    /// The servo did not reply to the controller.
    NoReply,
}

impl WriteStatus {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Ok),
            1 => Some(Self::WrongId),
            2 => Some(Self::AngleExcess),
            3 => Some(Self::NoReply),
            _ => None,
        }
    }
}

pub fn battery_request() -> [u8; 2] {
    [OP_BATTERY, 0x00]
}

pub fn servo_read_request(id: ServoId) -> [u8; 2] {
    [OP_SERVO_READ, id.wire()]
}

pub fn servo_read_all_request() -> [u8; 2] {
    [OP_SERVO_READ_ALL, 0x00]
}

pub fn servo_write_request(id: ServoId, angle: Angle, travel: u8) -> [u8; 6] {
    [
        OP_SERVO_WRITE,
        id.wire(),
        angle.degrees(),
        travel,
        TIME_FRAMES[0],
        TIME_FRAMES[1],
    ]
}

pub fn servo_write_all_request(angles: &[Angle; SERVO_COUNT], travel: u8) -> Vec<u8> {
    let mut payload = Vec::with_capacity(1 + SERVO_COUNT + 3);
    payload.push(OP_SERVO_WRITE_ALL);
    payload.extend(angles.iter().map(|angle| angle.degrees()));
    payload.push(travel);
    payload.extend_from_slice(&TIME_FRAMES);
    payload
}

pub fn servos_off_request() -> [u8; 2] {
    [OP_SERVOS_OFF, 0x00]
}

/// Decode the 4 battery reply parameters: big-endian millivolts, charge
/// state, remaining percent.
pub fn decode_battery(params: &[u8]) -> Result<BatteryStatus> {
    let &[hi, lo, state, percent] = params else {
        return Err(ProtocolError::MalformedReply("battery reply must be 4 bytes"));
    };
    let state = ChargeState::from_byte(state)
        .ok_or(ProtocolError::MalformedReply("unknown charge state"))?;
    Ok(BatteryStatus {
        millivolts: u16::from_be_bytes([hi, lo]),
        state,
        percent,
    })
}

/// Verify the servo-id echo of a single-servo reply and return the value
/// byte (position for reads, status code for writes).
pub fn check_echo(params: &[u8], id: ServoId) -> Result<u8> {
    let &[echo, value] = params else {
        return Err(ProtocolError::MalformedReply(
            "single-servo reply must be 2 bytes",
        ));
    };
    if echo != id.wire() {
        return Err(ProtocolError::EchoMismatch {
            expected: id.wire(),
            got: echo,
        });
    }
    Ok(value)
}

pub fn decode_write_status(byte: u8) -> Result<WriteStatus> {
    WriteStatus::from_byte(byte).ok_or(ProtocolError::MalformedReply("unknown write status code"))
}

/// Decode the 16 raw position bytes of a bulk read, ordered by servo index.
pub fn decode_positions(params: &[u8]) -> Result<[u8; SERVO_COUNT]> {
    params
        .try_into()
        .map_err(|_| ProtocolError::MalformedReply("bulk read reply must be 16 bytes"))
}

/// Decode the 16 status-code bytes of a bulk write, ordered by servo index.
pub fn decode_write_statuses(params: &[u8]) -> Result<[WriteStatus; SERVO_COUNT]> {
    if params.len() != SERVO_COUNT {
        return Err(ProtocolError::MalformedReply(
            "bulk write reply must be 16 bytes",
        ));
    }
    let mut statuses = [WriteStatus::Ok; SERVO_COUNT];
    for (status, byte) in statuses.iter_mut().zip(params) {
        *status = decode_write_status(*byte)?;
    }
    Ok(statuses)
}
