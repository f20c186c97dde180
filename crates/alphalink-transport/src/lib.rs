//! Byte-channel transport for the Alpha 1S control link.
//!
//! The robot is reached over a Bluetooth RFCOMM serial link. This crate
//! provides:
//! - The [`Channel`] contract the protocol layer is written against
//!   (blocking send, exact-length receive with a bounded wait)
//! - [`IoChannel`], a blocking adapter over any `Read + Write` stream,
//!   which is also the injection seam for fake channels in tests
//! - [`LinkStream`], the RFCOMM socket connector (Linux only)
//!
//! Resolving a device *name* to an address (Bluetooth inquiry) is not part
//! of this crate; callers supply a [`BdAddr`].

pub mod channel;
pub mod error;
pub mod rfcomm;

pub use channel::{Channel, IoChannel};
pub use error::{ChannelError, Result};
#[cfg(target_os = "linux")]
pub use rfcomm::LinkStream;
pub use rfcomm::{BdAddr, DEFAULT_RFCOMM_CHANNEL, DEFAULT_TIMEOUT};
