//! Control-code encoding for the Quantis PCI driver.
//!
//! Codes follow the Linux `_IOC` layout, lowest bits first:
//!
//! ```text
//!  31      30 29            16 15         8 7          0
//! +----------+----------------+------------+------------+
//! | dir (2)  |   size (14)    |  type (8)  |   nr (8)   |
//! +----------+----------------+------------+------------+
//! ```
//!
//! The operation set is closed. Each [`ControlOp`] carries its own direction,
//! so a code can never be submitted with the wrong payload discipline.

// ---------------------------------------------------------------------------
// Bit layout
// ---------------------------------------------------------------------------

const NR_BITS: u32 = 8;
const TYPE_BITS: u32 = 8;
const SIZE_BITS: u32 = 14;
const DIR_BITS: u32 = 2;

const NR_SHIFT: u32 = 0;
const TYPE_SHIFT: u32 = NR_SHIFT + NR_BITS;
const SIZE_SHIFT: u32 = TYPE_SHIFT + TYPE_BITS;
const DIR_SHIFT: u32 = SIZE_SHIFT + SIZE_BITS;

const NR_MASK: u32 = (1 << NR_BITS) - 1;
const TYPE_MASK: u32 = (1 << TYPE_BITS) - 1;
const SIZE_MASK: u32 = (1 << SIZE_BITS) - 1;
const DIR_MASK: u32 = (1 << DIR_BITS) - 1;

/// Type tag shared by every Quantis PCI control code.
pub const QUANTIS_MAGIC: u8 = b'q';

/// Size of every payload the driver exchanges (`unsigned int`).
pub const PAYLOAD_SIZE: u16 = 4;

/// Data-transfer direction, seen from userspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// No payload.
    None = 0,
    /// Userspace writes a payload to the driver.
    Write = 1,
    /// The driver fills a payload for userspace.
    Read = 2,
}

/// An unpacked control code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlCode {
    pub direction: Direction,
    pub kind: u8,
    pub number: u8,
    pub size: u16,
}

impl ControlCode {
    /// Pack the four fields into the numeric request identifier.
    ///
    /// `size` is confined to its 14-bit field.
    pub const fn encode(self) -> u32 {
        ((self.direction as u32 & DIR_MASK) << DIR_SHIFT)
            | ((self.kind as u32 & TYPE_MASK) << TYPE_SHIFT)
            | ((self.number as u32 & NR_MASK) << NR_SHIFT)
            | ((self.size as u32 & SIZE_MASK) << SIZE_SHIFT)
    }

    /// Split a packed identifier back into its fields.
    ///
    /// Returns `None` for the unused direction value `3`.
    pub const fn decode(raw: u32) -> Option<Self> {
        let direction = match (raw >> DIR_SHIFT) & DIR_MASK {
            0 => Direction::None,
            1 => Direction::Write,
            2 => Direction::Read,
            _ => return None,
        };
        Some(Self {
            direction,
            kind: ((raw >> TYPE_SHIFT) & TYPE_MASK) as u8,
            number: ((raw >> NR_SHIFT) & NR_MASK) as u8,
            size: ((raw >> SIZE_SHIFT) & SIZE_MASK) as u16,
        })
    }
}

/// `_IOR`: driver-to-user payload of `size` bytes.
pub const fn read_code(kind: u8, number: u8, size: u16) -> ControlCode {
    ControlCode {
        direction: Direction::Read,
        kind,
        number,
        size,
    }
}

/// `_IOW`: user-to-driver payload of `size` bytes.
pub const fn write_code(kind: u8, number: u8, size: u16) -> ControlCode {
    ControlCode {
        direction: Direction::Write,
        kind,
        number,
        size,
    }
}

/// `_IO`: no payload.
pub const fn none_code(kind: u8, number: u8) -> ControlCode {
    ControlCode {
        direction: Direction::None,
        kind,
        number,
        size: 0,
    }
}

// ---------------------------------------------------------------------------
// Operation set
// ---------------------------------------------------------------------------

/// Every control operation the driver understands.
///
/// Discriminants are the wire operation numbers and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlOp {
    GetDriverVersion = 0,
    GetCardCount = 1,
    GetModulesMask = 2,
    GetBoardVersion = 3,
    ResetBoard = 4,
    EnableModule = 5,
    DisableModule = 6,
    GetModulesStatus = 8,
    GetPciBusDeviceId = 9,
}

impl ControlOp {
    pub const ALL: [ControlOp; 9] = [
        Self::GetDriverVersion,
        Self::GetCardCount,
        Self::GetModulesMask,
        Self::GetBoardVersion,
        Self::ResetBoard,
        Self::EnableModule,
        Self::DisableModule,
        Self::GetModulesStatus,
        Self::GetPciBusDeviceId,
    ];

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn direction(self) -> Direction {
        match self {
            Self::ResetBoard => Direction::None,
            Self::EnableModule | Self::DisableModule => Direction::Write,
            Self::GetDriverVersion
            | Self::GetCardCount
            | Self::GetModulesMask
            | Self::GetBoardVersion
            | Self::GetModulesStatus
            | Self::GetPciBusDeviceId => Direction::Read,
        }
    }

    pub const fn code(self) -> ControlCode {
        match self.direction() {
            Direction::Read => read_code(QUANTIS_MAGIC, self.number(), PAYLOAD_SIZE),
            Direction::Write => write_code(QUANTIS_MAGIC, self.number(), PAYLOAD_SIZE),
            Direction::None => none_code(QUANTIS_MAGIC, self.number()),
        }
    }

    /// Numeric request identifier handed to the OS.
    pub const fn request(self) -> u32 {
        self.code().encode()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::GetDriverVersion => "get driver version",
            Self::GetCardCount => "get card count",
            Self::GetModulesMask => "get modules mask",
            Self::GetBoardVersion => "get board version",
            Self::ResetBoard => "reset board",
            Self::EnableModule => "enable module",
            Self::DisableModule => "disable module",
            Self::GetModulesStatus => "get modules status",
            Self::GetPciBusDeviceId => "get PCI bus/device id",
        }
    }
}

impl std::fmt::Display for ControlOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
