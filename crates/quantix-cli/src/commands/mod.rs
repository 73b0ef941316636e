pub mod bench;
pub mod control;
pub mod info;
pub mod read;
pub mod sample;
pub mod scan;
pub mod stream;

use quantix_core::{DeviceType, Quantix};

/// Pick the device prefix: explicit flag, else environment, else default.
pub fn resolve_prefix(flag: Option<&str>) -> String {
    match flag {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => quantix_core::device_prefix(),
    }
}

/// Bind to PCI device `index` under `prefix`.
pub fn bind(prefix: &str, index: u32) -> quantix_core::Result<Quantix> {
    Quantix::with_prefix(prefix, DeviceType::Pci, index)
}

/// Lowercase hex, two digits per byte.
pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}
