//! Control channel: submits one [`ControlOp`] against an open handle.
//!
//! The payload discipline comes from the operation's direction, never from
//! the caller. Every call is exactly one `ioctl(2)`.

use std::io;

use crate::error::{QuantixError, Result};
use crate::handle::DeviceHandle;
use crate::ioctl::{ControlOp, Direction};

/// Outcome of a control operation, tagged by direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlReply {
    /// Read-direction operations return the driver's 4-byte payload.
    Value(u32),
    /// Write- and none-direction operations only acknowledge.
    Done,
}

impl ControlReply {
    /// The returned value, or `0` for acknowledgements.
    pub fn value(self) -> u32 {
        match self {
            Self::Value(v) => v,
            Self::Done => 0,
        }
    }
}

/// Submit `op` on `handle`. `arg` is only sent for write-direction operations.
///
/// Hardware state may change as a side effect (reset, module enable/disable);
/// those operations are not idempotent.
pub fn perform(handle: &DeviceHandle, op: ControlOp, arg: u32) -> Result<ControlReply> {
    let fd = handle.raw_fd()?;
    let request = op.request();
    log::debug!(
        "{}: {op} (request {request:#010x}, arg {arg})",
        handle.path().display()
    );

    let (ret, reply) = match op.direction() {
        Direction::Read => {
            let mut buf = [0u8; 4];
            // SAFETY: fd is an open descriptor owned by `handle` for the
            // duration of this call; buf is a valid 4-byte out-parameter,
            // matching the driver's `unsigned int` payload.
            let ret = unsafe { libc::ioctl(fd, request as _, buf.as_mut_ptr()) };
            (ret, decode_reply(Direction::Read, buf))
        }
        Direction::Write => {
            let mut buf = arg.to_ne_bytes();
            // SAFETY: fd is open; buf is a valid 4-byte payload that outlives
            // the call.
            let ret = unsafe { libc::ioctl(fd, request as _, buf.as_mut_ptr()) };
            (ret, decode_reply(Direction::Write, buf))
        }
        Direction::None => {
            // SAFETY: fd is open; the request carries no payload.
            let ret = unsafe { libc::ioctl(fd, request as _) };
            (ret, decode_reply(Direction::None, [0; 4]))
        }
    };

    if ret < 0 {
        let err = io::Error::last_os_error();
        return Err(QuantixError::device_io(handle.path(), op.name(), err));
    }
    Ok(reply)
}

/// Interpret the payload buffer after a successful call.
///
/// Only read-direction operations carry a value back; the driver writes it as
/// a native-endian `unsigned int`.
pub(crate) fn decode_reply(direction: Direction, buf: [u8; 4]) -> ControlReply {
    match direction {
        Direction::Read => ControlReply::Value(u32::from_ne_bytes(buf)),
        Direction::Write | Direction::None => ControlReply::Done,
    }
}
