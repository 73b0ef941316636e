//! Device-node discovery.
//!
//! Quantis PCI boards appear as `<prefix><index>`, with `/dev/qrandom` as the
//! default prefix. The prefix can be moved with `QUANTIX_DEVICE_PREFIX`.

use std::path::{Path, PathBuf};

use crate::types::DeviceType;

/// Default device-node prefix for PCI boards.
pub const DEV_PREFIX: &str = "/dev/qrandom";

/// Environment variable that overrides [`DEV_PREFIX`].
pub const PREFIX_ENV: &str = "QUANTIX_DEVICE_PREFIX";

/// Resolve the active prefix: environment override, else [`DEV_PREFIX`].
pub fn device_prefix() -> String {
    match std::env::var(PREFIX_ENV) {
        Ok(p) if !p.is_empty() => p,
        _ => DEV_PREFIX.to_string(),
    }
}

/// Path of device `index` under `prefix`.
pub fn device_path(prefix: &str, index: u32) -> PathBuf {
    PathBuf::from(format!("{prefix}{index}"))
}

/// Count device nodes of `device_type` under the active prefix.
pub fn count_devices(device_type: DeviceType) -> usize {
    count_devices_with_prefix(&device_prefix(), device_type)
}

/// Count device nodes of `device_type` under `prefix`.
///
/// A node matches when its file name is the prefix's last component followed
/// by a decimal index. USB boards are never counted.
pub fn count_devices_with_prefix(prefix: &str, device_type: DeviceType) -> usize {
    if device_type == DeviceType::Usb {
        return 0;
    }
    list_devices_with_prefix(prefix).len()
}

/// Indices of PCI device nodes under `prefix`, ascending.
pub fn list_devices_with_prefix(prefix: &str) -> Vec<u32> {
    let prefix_path = Path::new(prefix);
    let (dir, stem) = match (prefix_path.parent(), prefix_path.file_name()) {
        (Some(dir), Some(stem)) => (dir, stem.to_string_lossy().into_owned()),
        _ => return Vec::new(),
    };
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("cannot list {}: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut indices: Vec<u32> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            let name = name.to_str()?;
            parse_index(name.strip_prefix(stem.as_str())?)
        })
        .collect();
    indices.sort_unstable();
    indices
}

fn parse_index(suffix: &str) -> Option<u32> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}
