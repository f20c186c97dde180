use bytes::BytesMut;
use tracing::trace;

use alphalink_frame::{decode_frame, encode_frame, frame_size};
use alphalink_transport::Channel;

use crate::command::{
    self, Angle, BatteryStatus, ServoId, WriteStatus, ALL_SERVOS_REPLY_LEN, BATTERY_REPLY_LEN,
    DEFAULT_TRAVEL, SERVO_COUNT, SERVO_REPLY_LEN,
};
use crate::error::{ProtocolError, Result};

/// Client for the Alpha 1S command protocol.
///
/// Owns one byte channel; each operation performs exactly one blocking
/// write followed by one exact-length read. The protocol has no request
/// identifiers, so `&mut self` on every operation is what keeps two
/// commands from ever being in flight together. No retries are attempted
/// here; callers wanting a retry policy can key off
/// [`ProtocolError::is_transient`].
pub struct Alpha1s<C> {
    channel: C,
}

impl<C: Channel> Alpha1s<C> {
    /// Take ownership of a connected channel.
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Consume the client and return the channel.
    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Query battery diagnostics.
    pub fn battery(&mut self) -> Result<BatteryStatus> {
        let params = self.exchange(&command::battery_request(), BATTERY_REPLY_LEN)?;
        command::decode_battery(&params)
    }

    /// Read one servo's position in degrees (0-180).
    ///
    /// Hardware side effect: reading a servo powers off its holding torque.
    pub fn servo_read(&mut self, id: ServoId) -> Result<u8> {
        let params = self.exchange(&command::servo_read_request(id), SERVO_REPLY_LEN)?;
        command::check_echo(&params, id)
    }

    /// Read all 16 servo positions, ordered by servo index.
    ///
    /// Hardware side effect: reading a servo powers off its holding torque.
    pub fn servo_read_all(&mut self) -> Result<[u8; SERVO_COUNT]> {
        let params = self.exchange(&command::servo_read_all_request(), ALL_SERVOS_REPLY_LEN)?;
        command::decode_positions(&params)
    }

    /// Move one servo to an angle with the default travel time.
    pub fn servo_write(&mut self, id: ServoId, angle: Angle) -> Result<WriteStatus> {
        self.servo_write_timed(id, angle, DEFAULT_TRAVEL)
    }

    /// Move one servo to an angle over `travel` time units.
    pub fn servo_write_timed(&mut self, id: ServoId, angle: Angle, travel: u8) -> Result<WriteStatus> {
        let params = self.exchange(&command::servo_write_request(id, angle, travel), SERVO_REPLY_LEN)?;
        let status = command::check_echo(&params, id)?;
        command::decode_write_status(status)
    }

    /// Move all 16 servos at once with the default travel time.
    ///
    /// `angles` must hold exactly [`SERVO_COUNT`] entries; anything else is
    /// rejected before a single byte is sent (there are no partial writes).
    pub fn servo_write_all(&mut self, angles: &[Angle]) -> Result<[WriteStatus; SERVO_COUNT]> {
        self.servo_write_all_timed(angles, DEFAULT_TRAVEL)
    }

    /// Move all 16 servos at once over `travel` time units.
    pub fn servo_write_all_timed(
        &mut self,
        angles: &[Angle],
        travel: u8,
    ) -> Result<[WriteStatus; SERVO_COUNT]> {
        let angles: &[Angle; SERVO_COUNT] = angles.try_into().map_err(|_| {
            ProtocolError::InvalidArgument(format!(
                "expected {SERVO_COUNT} angles, got {}",
                angles.len()
            ))
        })?;
        let params = self.exchange(
            &command::servo_write_all_request(angles, travel),
            ALL_SERVOS_REPLY_LEN,
        )?;
        command::decode_write_statuses(&params)
    }

    /// Power off all servos.
    ///
    /// Fire-and-forget: the robot sends no reply, so the only failure mode
    /// is the send itself.
    pub fn servos_off(&mut self) -> Result<()> {
        self.send_only(&command::servos_off_request())
    }

    fn send_only(&mut self, request: &[u8]) -> Result<()> {
        let mut buf = BytesMut::with_capacity(frame_size(request.len()));
        encode_frame(request, &mut buf)?;
        trace!(op = request[0], len = buf.len(), "sending command");
        self.channel.send(&buf)?;
        Ok(())
    }

    /// One command/reply round trip, returning the reply's parameter bytes.
    ///
    /// The reply is read at a length predicted from the fixed per-operation
    /// table: the device's own length byte is validated during decode but
    /// never used to size the read, so a corrupted length byte cannot cause
    /// a short or blocking read. The echoed command byte ahead of the
    /// parameters is stripped here.
    fn exchange(&mut self, request: &[u8], reply_params: usize) -> Result<Vec<u8>> {
        self.send_only(request)?;

        let mut reply = vec![0u8; frame_size(reply_params + 1)];
        self.channel.recv_exact(&mut reply)?;
        let payload = decode_frame(&reply)?;
        trace!(op = request[0], params = reply_params, "reply validated");
        Ok(payload[1..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use alphalink_transport::ChannelError;

    use super::*;
    use crate::command::ChargeState;

    /// Scripted channel: records sent frames, plays back canned replies.
    struct FakeChannel {
        sent: Vec<Vec<u8>>,
        replies: VecDeque<std::result::Result<Vec<u8>, ChannelError>>,
    }

    impl FakeChannel {
        fn new(replies: Vec<std::result::Result<Vec<u8>, ChannelError>>) -> Self {
            Self {
                sent: Vec::new(),
                replies: replies.into(),
            }
        }

        fn silent() -> Self {
            Self::new(Vec::new())
        }
    }

    impl Channel for FakeChannel {
        fn send(&mut self, frame: &[u8]) -> alphalink_transport::Result<()> {
            self.sent.push(frame.to_vec());
            Ok(())
        }

        fn recv_exact(&mut self, buf: &mut [u8]) -> alphalink_transport::Result<()> {
            match self.replies.pop_front() {
                Some(Ok(bytes)) => {
                    assert_eq!(bytes.len(), buf.len(), "scripted reply length mismatch");
                    buf.copy_from_slice(&bytes);
                    Ok(())
                }
                Some(Err(err)) => Err(err),
                None => Err(ChannelError::Timeout),
            }
        }
    }

    fn reply_frame(payload: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_frame(payload, &mut buf).unwrap();
        buf.to_vec()
    }

    #[test]
    fn battery_roundtrip() {
        let reply = reply_frame(&[0x18, 0x0F, 0x12, 0x01, 0x5A]);
        let mut robot = Alpha1s::new(FakeChannel::new(vec![Ok(reply)]));

        let status = robot.battery().unwrap();
        assert_eq!(status.millivolts, 3858);
        assert_eq!(status.state, ChargeState::Charging);
        assert_eq!(status.percent, 90);

        let channel = robot.into_channel();
        assert_eq!(
            channel.sent,
            vec![vec![0xFB, 0xBF, 0x04, 0x18, 0x00, 0x1C, 0xED]]
        );
    }

    #[test]
    fn servo_read_returns_position() {
        let id = ServoId::new(3).unwrap();
        let reply = reply_frame(&[0x24, 0x04, 0x5A]);
        let mut robot = Alpha1s::new(FakeChannel::new(vec![Ok(reply)]));

        assert_eq!(robot.servo_read(id).unwrap(), 90);
        assert_eq!(robot.into_channel().sent[0][3..5], [0x24, 0x04]);
    }

    #[test]
    fn servo_read_rejects_wrong_echo() {
        // Frame and checksum are valid; only the echoed id is wrong.
        let id = ServoId::new(3).unwrap();
        let reply = reply_frame(&[0x24, 0x05, 0x5A]);
        let mut robot = Alpha1s::new(FakeChannel::new(vec![Ok(reply)]));

        let err = robot.servo_read(id).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::EchoMismatch {
                expected: 4,
                got: 5
            }
        ));
        assert!(err.is_transient());
    }

    #[test]
    fn servo_read_all_returns_ordered_positions() {
        let positions: Vec<u8> = (0..16).map(|i| 10 + i as u8).collect();
        let mut payload = vec![0x25];
        payload.extend_from_slice(&positions);
        let mut robot = Alpha1s::new(FakeChannel::new(vec![Ok(reply_frame(&payload))]));

        let read = robot.servo_read_all().unwrap();
        assert_eq!(read.to_vec(), positions);
    }

    #[test]
    fn servo_write_decodes_status() {
        let id = ServoId::new(0).unwrap();
        let angle = Angle::new(120).unwrap();
        let reply = reply_frame(&[0x22, 0x01, 0x02]);
        let mut robot = Alpha1s::new(FakeChannel::new(vec![Ok(reply)]));

        assert_eq!(robot.servo_write(id, angle).unwrap(), WriteStatus::AngleExcess);

        let sent = robot.into_channel().sent;
        // Payload: opcode, wire id, angle, default travel, time frames.
        assert_eq!(sent[0][3..9], [0x22, 0x01, 0x78, 0x14, 0x00, 0x10]);
    }

    #[test]
    fn servo_write_rejects_unknown_status_code() {
        let id = ServoId::new(0).unwrap();
        let angle = Angle::new(10).unwrap();
        let reply = reply_frame(&[0x22, 0x01, 0x09]);
        let mut robot = Alpha1s::new(FakeChannel::new(vec![Ok(reply)]));

        let err = robot.servo_write(id, angle).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedReply(_)));
    }

    #[test]
    fn write_all_rejects_wrong_length_before_sending() {
        for len in [15usize, 17] {
            let angles = vec![Angle::new(90).unwrap(); len];
            let mut robot = Alpha1s::new(FakeChannel::silent());
            let err = robot.servo_write_all(&angles).unwrap_err();
            assert!(matches!(err, ProtocolError::InvalidArgument(_)));
            assert!(!err.is_transient());
            assert!(
                robot.into_channel().sent.is_empty(),
                "no bytes may be sent for a rejected argument"
            );
        }
    }

    #[test]
    fn write_all_decodes_per_servo_statuses() {
        let angles = vec![Angle::new(45).unwrap(); 16];
        let mut payload = vec![0x23];
        payload.extend_from_slice(&[0u8; 15]);
        payload.push(3);
        let mut robot = Alpha1s::new(FakeChannel::new(vec![Ok(reply_frame(&payload))]));

        let statuses = robot.servo_write_all_timed(&angles, 25).unwrap();
        assert!(statuses[..15].iter().all(|s| *s == WriteStatus::Ok));
        assert_eq!(statuses[15], WriteStatus::NoReply);

        let sent = robot.into_channel().sent;
        assert_eq!(sent[0][3], 0x23);
        assert_eq!(sent[0][4..20], [45u8; 16]);
        assert_eq!(sent[0][20..23], [25, 0x00, 0x10]);
    }

    #[test]
    fn servos_off_is_fire_and_forget() {
        let mut robot = Alpha1s::new(FakeChannel::silent());
        robot.servos_off().unwrap();

        let channel = robot.into_channel();
        assert_eq!(channel.sent, vec![vec![0xFB, 0xBF, 0x04, 0x0C, 0x00, 0x10, 0xED]]);
        assert!(channel.replies.is_empty(), "no read may be attempted");
    }

    #[test]
    fn corrupted_reply_is_a_transient_frame_error() {
        let mut reply = reply_frame(&[0x18, 0x0F, 0x12, 0x01, 0x5A]);
        reply[4] ^= 0x01;
        let mut robot = Alpha1s::new(FakeChannel::new(vec![Ok(reply)]));

        let err = robot.battery().unwrap_err();
        assert!(matches!(err, ProtocolError::Frame(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn timeout_is_transient_channel_fault() {
        let mut robot = Alpha1s::new(FakeChannel::new(vec![Err(ChannelError::Timeout)]));
        let err = robot.battery().unwrap_err();
        assert!(matches!(err, ProtocolError::Channel(ChannelError::Timeout)));
        assert!(err.is_transient());
    }

    #[test]
    fn io_fault_is_not_transient() {
        let io = ChannelError::Io(std::io::Error::other("link dropped"));
        let mut robot = Alpha1s::new(FakeChannel::new(vec![Err(io)]));
        let err = robot.battery().unwrap_err();
        assert!(matches!(err, ProtocolError::Channel(ChannelError::Io(_))));
        assert!(!err.is_transient());
    }
}
