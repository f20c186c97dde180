use std::io::{ErrorKind, Read, Write};

use crate::error::{ChannelError, Result};

/// A bidirectional byte channel to the robot.
///
/// The wire protocol carries no request identifiers, so two in-flight
/// commands are indistinguishable on reply. Both methods take `&mut self`
/// and callers must complete one send/receive exchange before starting the
/// next; sharing a channel across call sites requires external
/// mutual exclusion.
pub trait Channel {
    /// Write a complete message (blocking).
    fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// Read exactly `buf.len()` bytes, waiting no longer than the channel's
    /// configured timeout. A short read is an error, not a partial result.
    fn recv_exact(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// Blocking [`Channel`] over any `Read + Write` byte stream.
///
/// Retries interrupted syscalls and maps timeout-class errors to
/// [`ChannelError::Timeout`]. The stream's own read/write timeouts bound
/// each wait (see [`LinkStream`](crate::rfcomm::LinkStream)).
pub struct IoChannel<T> {
    inner: T,
}

impl<T> IoChannel<T> {
    /// Wrap a connected byte stream.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the channel and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + Write> Channel for IoChannel<T> {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < frame.len() {
            match self.inner.write(&frame[offset..]) {
                Ok(0) => return Err(ChannelError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(map_io(err)),
            }
        }
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(map_io(err)),
            }
        }
    }

    fn recv_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => return Err(ChannelError::Closed),
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(map_io(err)),
            }
        }
        Ok(())
    }
}

fn map_io(err: std::io::Error) -> ChannelError {
    match err.kind() {
        ErrorKind::TimedOut | ErrorKind::WouldBlock => ChannelError::Timeout,
        _ => ChannelError::Io(err),
    }
}
