//! Command protocol for the UBTECH Alpha 1S humanoid robot.
//!
//! Maps the robot's fixed operation set (battery query, single/bulk servo
//! read, single/bulk servo write, servo power-off) onto checksummed frames
//! from `alphalink-frame`, sent over an injected
//! [`Channel`](alphalink_transport::Channel).
//!
//! One command at a time: each operation is a single blocking write
//! followed by one exact-length read. Corrupted or misrouted replies are
//! routine, discriminated errors; no retry policy lives here.

pub mod client;
pub mod command;
pub mod error;

pub use client::Alpha1s;
pub use command::{
    Angle, BatteryStatus, ChargeState, ServoId, WriteStatus, DEFAULT_TRAVEL, SERVO_COUNT,
};
pub use error::{ProtocolError, Result};
