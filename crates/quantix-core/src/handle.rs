//! Ownership of one open device connection.
//!
//! A [`DeviceHandle`] is created closed. [`DeviceHandle::acquire`] and
//! [`DeviceHandle::release`] are the only state transitions; the open
//! descriptor lives in an `Option<File>`, so "descriptor present" and "open"
//! cannot drift apart.

use std::fs::File;
use std::io;
use std::os::fd::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};

use crate::discovery::device_path;
use crate::error::{QuantixError, Result};
use crate::types::DeviceType;

/// One device node and, while acquired, its descriptor.
#[derive(Debug)]
pub struct DeviceHandle {
    device_type: DeviceType,
    index: u32,
    path: PathBuf,
    file: Option<File>,
}

impl DeviceHandle {
    /// Bind to `<prefix><index>` without opening it.
    ///
    /// Fails with `Unsupported` for USB boards and `NotFound` when no node
    /// exists at the path.
    pub fn new(prefix: &str, device_type: DeviceType, index: u32) -> Result<Self> {
        if device_type == DeviceType::Usb {
            return Err(QuantixError::Unsupported { device_type });
        }
        let path = device_path(prefix, index);
        if !path.exists() {
            return Err(QuantixError::NotFound { path });
        }
        Ok(Self {
            device_type,
            index,
            path,
            file: None,
        })
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Open the node for unbuffered reading. No-op when already open.
    ///
    /// On failure the handle stays closed.
    pub fn acquire(&mut self) -> Result<()> {
        if self.file.is_some() {
            return Ok(());
        }
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => QuantixError::PermissionDenied {
                path: self.path.clone(),
                source: e,
            },
            io::ErrorKind::NotFound => QuantixError::NotFound {
                path: self.path.clone(),
            },
            _ => QuantixError::device_io(&self.path, "open", e),
        })?;
        log::debug!("opened {}", self.path.display());
        self.file = Some(file);
        Ok(())
    }

    /// Close the descriptor if open. Never fails; safe to call repeatedly.
    pub fn release(&mut self) {
        if let Some(file) = self.file.take() {
            // Close errors are dropped along with the descriptor.
            drop(file);
            log::debug!("closed {}", self.path.display());
        }
    }

    /// Borrow the open file, or fail with `NotOpen`.
    pub(crate) fn file(&self) -> Result<&File> {
        self.file.as_ref().ok_or_else(|| QuantixError::NotOpen {
            path: self.path.clone(),
        })
    }

    /// Raw descriptor of the open file, or `NotOpen`.
    pub(crate) fn raw_fd(&self) -> Result<RawFd> {
        self.file().map(AsRawFd::as_raw_fd)
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        if self.file.is_some() {
            log::warn!(
                "{} dropped while open; releasing descriptor",
                self.path.display()
            );
            self.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("qrandom0"), [0u8; 32]).unwrap();
        let prefix = format!("{}/qrandom", dir.path().display());
        (dir, prefix)
    }

    #[test]
    fn test_new_does_not_open() {
        let (_dir, prefix) = fixture();
        let handle = DeviceHandle::new(&prefix, DeviceType::Pci, 0).unwrap();
        assert!(!handle.is_open());
        assert_eq!(handle.index(), 0);
        assert!(handle.path().ends_with("qrandom0"));
    }

    #[test]
    fn test_new_missing_node() {
        let (_dir, prefix) = fixture();
        let err = DeviceHandle::new(&prefix, DeviceType::Pci, 999).unwrap_err();
        assert!(matches!(err, QuantixError::NotFound { .. }));
    }

    #[test]
    fn test_usb_rejected() {
        let (_dir, prefix) = fixture();
        let err = DeviceHandle::new(&prefix, DeviceType::Usb, 0).unwrap_err();
        assert!(matches!(err, QuantixError::Unsupported { .. }));
    }

    #[test]
    fn test_acquire_release_cycle() {
        let (_dir, prefix) = fixture();
        let mut handle = DeviceHandle::new(&prefix, DeviceType::Pci, 0).unwrap();

        handle.acquire().unwrap();
        assert!(handle.is_open());
        let fd = handle.raw_fd().unwrap();

        // Second acquire keeps the same descriptor.
        handle.acquire().unwrap();
        assert_eq!(handle.raw_fd().unwrap(), fd);

        handle.release();
        assert!(!handle.is_open());
        handle.release();
        assert!(!handle.is_open());

        handle.acquire().unwrap();
        assert!(handle.is_open());
    }

    #[test]
    fn test_release_never_opened() {
        let (_dir, prefix) = fixture();
        let mut handle = DeviceHandle::new(&prefix, DeviceType::Pci, 0).unwrap();
        handle.release();
        assert!(matches!(
            handle.raw_fd().unwrap_err(),
            QuantixError::NotOpen { .. }
        ));
    }

    #[test]
    fn test_failed_acquire_leaves_closed() {
        let (dir, prefix) = fixture();
        let mut handle = DeviceHandle::new(&prefix, DeviceType::Pci, 0).unwrap();
        std::fs::remove_file(dir.path().join("qrandom0")).unwrap();

        let err = handle.acquire().unwrap_err();
        assert!(matches!(err, QuantixError::NotFound { .. }));
        assert!(!handle.is_open());
        handle.release();
    }
}
