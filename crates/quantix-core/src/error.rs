//! Error taxonomy for device access.
//!
//! Two classes of failure exist. Caller mistakes ([`QuantixError::InvalidArgument`])
//! are detected before any system call is issued. Everything else is a device
//! failure and carries the path of the node it happened on. OS errors only ever
//! appear as the `source` of a variant, never on their own.

use std::io;
use std::path::{Path, PathBuf};

use crate::types::DeviceType;

/// Result type alias for device operations.
pub type Result<T> = std::result::Result<T, QuantixError>;

/// Errors returned by the quantix client.
#[derive(Debug, thiserror::Error)]
pub enum QuantixError {
    /// No device node exists at the expected path.
    #[error("Device {} not found. Is the driver loaded?", path.display())]
    NotFound { path: PathBuf },

    /// The requested device family is recognised but not supported.
    #[error("{device_type} devices not supported")]
    Unsupported { device_type: DeviceType },

    /// The OS refused to open the node.
    #[error("Permission denied for {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An operation was attempted on a handle that is not acquired.
    #[error("Device {} is not open; acquire it before use", path.display())]
    NotOpen { path: PathBuf },

    /// A control or I/O operation failed at the OS level.
    #[error("{operation} failed on {}: {source}", path.display())]
    DeviceIo {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    /// The device returned fewer bytes than requested.
    #[error("Read {actual} bytes, expected {requested} from {}", path.display())]
    ShortRead {
        path: PathBuf,
        requested: usize,
        actual: usize,
    },

    /// Bad size, range or module number supplied by the caller.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl QuantixError {
    pub(crate) fn device_io(path: &Path, operation: &'static str, source: io::Error) -> Self {
        Self::DeviceIo {
            path: path.to_path_buf(),
            operation,
            source,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Path of the device node involved, if the error is tied to one.
    pub fn device_path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path }
            | Self::PermissionDenied { path, .. }
            | Self::NotOpen { path }
            | Self::DeviceIo { path, .. }
            | Self::ShortRead { path, .. } => Some(path),
            Self::Unsupported { .. } | Self::InvalidArgument(_) => None,
        }
    }

    /// `true` for failures originating in the device or OS, `false` for
    /// caller programming errors. Using a handle that was never acquired (or
    /// already released) is a caller error.
    pub fn is_device_failure(&self) -> bool {
        !matches!(
            self,
            Self::InvalidArgument(_) | Self::Unsupported { .. } | Self::NotOpen { .. }
        )
    }
}
