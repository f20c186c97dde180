//! Bluetooth RFCOMM link to the robot.
//!
//! The Alpha 1S exposes its control protocol as a serial service on RFCOMM
//! channel 6. [`LinkStream`] opens that connection and hands back a plain
//! blocking byte stream with read/write timeouts applied; the socket is
//! closed deterministically when the stream is dropped.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ChannelError;

/// RFCOMM channel the robot's serial service listens on.
pub const DEFAULT_RFCOMM_CHANNEL: u8 = 6;

/// Read/write timeout applied to a freshly connected link.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A Bluetooth device address, e.g. `04:B1:67:2A:3F:08`.
///
/// Stored in display order; the kernel wants the bytes reversed, which the
/// connector handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BdAddr([u8; 6]);

impl BdAddr {
    /// Build an address from octets in display order (as printed).
    pub const fn from_bytes(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Octets in display order.
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Octets in the byte order the kernel's `sockaddr_rc` expects.
    #[cfg(target_os = "linux")]
    fn kernel_order(&self) -> [u8; 6] {
        let mut out = self.0;
        out.reverse();
        out
    }
}

impl FromStr for BdAddr {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |reason| ChannelError::BadAddress {
            addr: s.to_string(),
            reason,
        };

        let mut octets = [0u8; 6];
        let mut parts = s.split(':');
        for octet in &mut octets {
            let part = parts
                .next()
                .ok_or_else(|| bad("expected six colon-separated octets"))?;
            if part.len() != 2 {
                return Err(bad("each octet must be two hex digits"));
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| bad("octet is not hex"))?;
        }
        if parts.next().is_some() {
            return Err(bad("expected six colon-separated octets"));
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

#[cfg(target_os = "linux")]
pub use linux::LinkStream;

#[cfg(target_os = "linux")]
mod linux {
    use std::io::{Read, Write};
    use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
    use std::os::unix::net::UnixStream;
    use std::time::Duration;

    use tracing::debug;

    use super::BdAddr;
    use crate::error::{ChannelError, Result};

    const BTPROTO_RFCOMM: libc::c_int = 3;

    #[repr(C)]
    struct SockaddrRc {
        rc_family: libc::sa_family_t,
        rc_bdaddr: [u8; 6],
        rc_channel: u8,
    }

    /// A connected RFCOMM byte stream to the robot.
    ///
    /// The connected socket descriptor is wrapped in a `UnixStream`, which
    /// gives plain `read`/`write` syscalls and `SO_RCVTIMEO`/`SO_SNDTIMEO`
    /// timeout handling over any stream socket.
    pub struct LinkStream {
        inner: UnixStream,
    }

    impl LinkStream {
        /// Connect to the robot at `addr` with default channel and timeout.
        pub fn connect(addr: BdAddr) -> Result<Self> {
            Self::connect_with(addr, super::DEFAULT_RFCOMM_CHANNEL, super::DEFAULT_TIMEOUT)
        }

        /// Connect with an explicit RFCOMM channel and read/write timeout.
        pub fn connect_with(addr: BdAddr, channel: u8, timeout: Duration) -> Result<Self> {
            let connect_err = |source| ChannelError::Connect {
                addr: addr.to_string(),
                channel,
                source,
            };

            // SAFETY: plain socket(2) call; the return value is checked
            // before the descriptor is used.
            let fd = unsafe {
                libc::socket(
                    libc::AF_BLUETOOTH,
                    libc::SOCK_STREAM | libc::SOCK_CLOEXEC,
                    BTPROTO_RFCOMM,
                )
            };
            if fd < 0 {
                return Err(connect_err(std::io::Error::last_os_error()));
            }
            // SAFETY: `fd` was just returned by socket(2) and is not owned
            // by anything else; OwnedFd closes it on every exit path below.
            let owned = unsafe { OwnedFd::from_raw_fd(fd) };

            let sa = SockaddrRc {
                rc_family: libc::AF_BLUETOOTH as libc::sa_family_t,
                rc_bdaddr: addr.kernel_order(),
                rc_channel: channel,
            };
            // SAFETY: `sa` is a properly initialized sockaddr_rc and the
            // length argument matches its size; `owned` is a valid open
            // socket descriptor.
            let rc = unsafe {
                libc::connect(
                    owned.as_raw_fd(),
                    (&sa as *const SockaddrRc).cast::<libc::sockaddr>(),
                    std::mem::size_of::<SockaddrRc>() as libc::socklen_t,
                )
            };
            if rc != 0 {
                return Err(connect_err(std::io::Error::last_os_error()));
            }

            let stream = UnixStream::from(owned);
            stream.set_read_timeout(Some(timeout))?;
            stream.set_write_timeout(Some(timeout))?;
            debug!(%addr, channel, ?timeout, "connected rfcomm link");

            Ok(Self { inner: stream })
        }

        /// Set the read timeout on the link.
        pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
            self.inner.set_read_timeout(timeout).map_err(Into::into)
        }

        /// Set the write timeout on the link.
        pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
            self.inner.set_write_timeout(timeout).map_err(Into::into)
        }

        /// Try to clone this link (creates a new file descriptor).
        pub fn try_clone(&self) -> Result<Self> {
            let cloned = self.inner.try_clone()?;
            Ok(Self { inner: cloned })
        }
    }

    impl Read for LinkStream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Write for LinkStream {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.inner.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.inner.flush()
        }
    }

    impl std::fmt::Debug for LinkStream {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("LinkStream")
                .field("fd", &self.inner.as_raw_fd())
                .finish()
        }
    }
}
