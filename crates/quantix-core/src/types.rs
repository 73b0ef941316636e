//! Device families and decoded hardware state.
//!
//! These are value types only. Nothing here talks to the device; the facade
//! fills them from control-operation replies.

use serde::Serialize;

/// Number of quantum modules a board can carry.
pub const MAX_MODULES: u8 = 4;

/// Raw entropy throughput of one working PCI module, in bytes per second
/// (4 Mbit/s).
pub const MODULE_DATA_RATE: u32 = 500_000;

/// Family of Quantis device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceType {
    /// PCI / PCIe card exposed as `/dev/qrandomN`.
    Pci,
    /// USB variant. Recognised but never supported.
    Usb,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pci => write!(f, "PCI"),
            Self::Usb => write!(f, "USB"),
        }
    }
}

impl std::str::FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pci" | "pcie" => Ok(Self::Pci),
            "usb" => Ok(Self::Usb),
            other => Err(format!("unknown device type '{other}'")),
        }
    }
}

/// Bitmask over the four quantum modules of a board.
///
/// Only the low four bits are meaningful. The raw register value is kept as
/// reported so inconsistent hardware stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct ModuleMask(u32);

impl ModuleMask {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The meaningful low four bits.
    pub const fn bits(self) -> u8 {
        (self.0 & 0x0F) as u8
    }

    /// Number of modules set in the mask.
    pub const fn count(self) -> u32 {
        self.bits().count_ones()
    }

    /// Whether `module` (0-3) is set.
    pub fn contains(self, module: u8) -> bool {
        module < MAX_MODULES && self.0 & (1 << module) != 0
    }

    /// Every bit set in `self` is also set in `other`.
    pub const fn is_subset_of(self, other: ModuleMask) -> bool {
        self.0 & other.0 == self.0
    }

    /// Module numbers present in the mask, ascending.
    pub fn modules(self) -> impl Iterator<Item = u8> {
        (0..MAX_MODULES).filter(move |&m| self.contains(m))
    }
}

impl std::fmt::Display for ModuleMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06b}", self.bits())
    }
}

/// PCI location of the board, decoded from the bus/device register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PciLocation {
    /// Bits 16-31 of the register.
    pub bus: u16,
    /// Bits 0-15 of the register.
    pub device: u16,
}

impl PciLocation {
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            bus: (raw >> 16) as u16,
            device: (raw & 0xFFFF) as u16,
        }
    }
}

impl std::fmt::Display for PciLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04x}:{:04x}", self.bus, self.device)
    }
}

/// Snapshot of every query the board answers.
///
/// Produced by [`crate::Quantix::device_info`]. Values are read fresh from the
/// hardware; nothing is cached between snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub device_type: DeviceType,
    pub device_number: u32,
    pub device_path: String,
    /// Driver version, already scaled (raw register / 10).
    pub driver_version: f64,
    pub board_version: u32,
    pub card_count: u32,
    pub modules_mask: ModuleMask,
    pub modules_status: ModuleMask,
    pub modules_count: u32,
    /// Bytes per second delivered by the working modules.
    pub modules_data_rate: u32,
    pub pci: PciLocation,
}

/// Driver version register to the dotted version (`21` -> `2.1`).
pub fn driver_version_from_raw(raw: u32) -> f64 {
    f64::from(raw) / 10.0
}
