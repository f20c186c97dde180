//! Drives the client over a real byte stream, with a thread playing the
//! robot end of the link.

#![cfg(unix)]

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::thread;
use std::time::Duration;

use bytes::BytesMut;

use alphalink_frame::{decode_frame, encode_frame};
use alphalink_proto::{Alpha1s, Angle, ChargeState, ProtocolError, ServoId, WriteStatus};
use alphalink_transport::{ChannelError, IoChannel};

fn frame(payload: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    encode_frame(payload, &mut buf).unwrap();
    buf.to_vec()
}

#[test]
fn full_session_against_scripted_robot() {
    let (controller, mut robot) = UnixStream::pair().unwrap();
    controller
        .set_read_timeout(Some(Duration::from_secs(1)))
        .unwrap();

    let server = thread::spawn(move || {
        // Battery query: 7-byte request frame, 4 reply parameters.
        let mut req = [0u8; 7];
        robot.read_exact(&mut req).unwrap();
        assert_eq!(decode_frame(&req).unwrap(), [0x18, 0x00]);
        robot
            .write_all(&frame(&[0x18, 0x0F, 0x12, 0x00, 0x64]))
            .unwrap();

        // Single servo write: 6-byte payload, echoed id plus status.
        let mut req = [0u8; 11];
        robot.read_exact(&mut req).unwrap();
        let payload = decode_frame(&req).unwrap();
        assert_eq!(payload[0], 0x22);
        let wire_id = payload[1];
        robot.write_all(&frame(&[0x22, wire_id, 0x00])).unwrap();

        // Servos off: request only, no reply.
        let mut req = [0u8; 7];
        robot.read_exact(&mut req).unwrap();
        assert_eq!(decode_frame(&req).unwrap(), [0x0C, 0x00]);
    });

    let mut client = Alpha1s::new(IoChannel::new(controller));

    let battery = client.battery().unwrap();
    assert_eq!(battery.millivolts, 3858);
    assert_eq!(battery.state, ChargeState::NotCharging);
    assert_eq!(battery.percent, 100);

    let status = client
        .servo_write(ServoId::new(5).unwrap(), Angle::new(90).unwrap())
        .unwrap();
    assert_eq!(status, WriteStatus::Ok);

    client.servos_off().unwrap();
    server.join().unwrap();
}

#[test]
fn silent_robot_times_out_and_link_stays_usable() {
    let (controller, mut robot) = UnixStream::pair().unwrap();
    controller
        .set_read_timeout(Some(Duration::from_millis(50)))
        .unwrap();

    let server = thread::spawn(move || {
        // Swallow the first request without answering, then serve the
        // retry normally.
        let mut req = [0u8; 7];
        robot.read_exact(&mut req).unwrap();
        robot.read_exact(&mut req).unwrap();
        robot
            .write_all(&frame(&[0x18, 0x0F, 0x12, 0x01, 0x5A]))
            .unwrap();
    });

    let mut client = Alpha1s::new(IoChannel::new(controller));

    let err = client.battery().unwrap_err();
    assert!(matches!(err, ProtocolError::Channel(ChannelError::Timeout)));
    assert!(err.is_transient());

    let battery = client.battery().unwrap();
    assert_eq!(battery.percent, 90);
    assert_eq!(battery.state, ChargeState::Charging);

    server.join().unwrap();
}
