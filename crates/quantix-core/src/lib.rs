//! # quantix-core
//!
//! **Userspace client for Quantis PCI quantum random number generators.**
//!
//! The kernel driver exposes each board as a character device
//! (`/dev/qrandom0`, `/dev/qrandom1`, ...). This crate opens the node, talks to
//! the board through its fixed set of `ioctl` control operations, and turns the
//! raw byte stream into typed random values.
//!
//! ## Quick Start
//!
//! ```no_run
//! use quantix_core::{DeviceType, Quantix, count_devices};
//!
//! if count_devices(DeviceType::Pci) == 0 {
//!     return Ok(());
//! }
//!
//! let mut qrng = Quantix::new(DeviceType::Pci, 0)?;
//! let dev = qrng.open()?;
//!
//! let bytes = dev.read(16)?;
//! assert_eq!(bytes.len(), 16);
//!
//! let die = dev.read_int_range(1, 6)?;
//! let x = dev.read_double()?;
//! println!("{die} {x:.15} driver {}", dev.driver_version()?);
//! # Ok::<(), quantix_core::QuantixError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Quantix (facade)
//!   ├── DeviceHandle   open / release, owns the descriptor
//!   ├── control        one ioctl per call, payload by direction
//!   │     └── ioctl    control-code encoding, closed op set
//!   └── reader         exact-length reads, typed conversions
//! ```
//!
//! The layer is synchronous and blocking. A handle is meant for one user at a
//! time; callers that share a board across threads serialise access
//! themselves.

pub mod control;
pub mod device;
pub mod discovery;
pub mod error;
pub mod handle;
pub mod ioctl;
pub mod reader;
pub mod types;

pub use control::ControlReply;
pub use device::{OpenDevice, Quantix};
pub use discovery::{
    DEV_PREFIX, PREFIX_ENV, count_devices, count_devices_with_prefix, device_path, device_prefix,
    list_devices_with_prefix,
};
pub use error::{QuantixError, Result};
pub use handle::DeviceHandle;
pub use ioctl::{ControlCode, ControlOp, Direction};
pub use types::{DeviceInfo, DeviceType, MAX_MODULES, MODULE_DATA_RATE, ModuleMask, PciLocation};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
