//! The [`Quantix`] device facade.
//!
//! Composes the handle lifecycle, the control channel and the entropy reader
//! behind one object. Query and read calls require the device to be acquired,
//! either through the scoped [`Quantix::open`] guard or manual
//! [`Quantix::acquire`] / [`Quantix::close`].

use std::ops::{Deref, DerefMut};
use std::path::Path;

use crate::control::{self, ControlReply};
use crate::discovery::device_prefix;
use crate::error::{QuantixError, Result};
use crate::handle::DeviceHandle;
use crate::ioctl::ControlOp;
use crate::reader;
use crate::types::{
    DeviceInfo, DeviceType, MAX_MODULES, MODULE_DATA_RATE, ModuleMask, PciLocation,
    driver_version_from_raw,
};

/// Interface to one Quantis quantum random number generator.
#[derive(Debug)]
pub struct Quantix {
    handle: DeviceHandle,
}

impl Quantix {
    /// Bind to device `index` under the active prefix. Does not open it.
    pub fn new(device_type: DeviceType, index: u32) -> Result<Self> {
        Self::with_prefix(&device_prefix(), device_type, index)
    }

    /// Bind to `<prefix><index>`. Does not open it.
    pub fn with_prefix(prefix: &str, device_type: DeviceType, index: u32) -> Result<Self> {
        let handle = DeviceHandle::new(prefix, device_type, index)?;
        Ok(Self { handle })
    }

    pub fn device_type(&self) -> DeviceType {
        self.handle.device_type()
    }

    pub fn device_number(&self) -> u32 {
        self.handle.index()
    }

    pub fn device_path(&self) -> &Path {
        self.handle.path()
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Acquire the device and return a guard that releases it on drop.
    pub fn open(&mut self) -> Result<OpenDevice<'_>> {
        self.handle.acquire()?;
        Ok(OpenDevice { device: self })
    }

    /// Acquire without a guard. Pair with [`Quantix::close`].
    pub fn acquire(&mut self) -> Result<()> {
        self.handle.acquire()
    }

    /// Release the device. Never fails; repeated calls are no-ops.
    pub fn close(&mut self) {
        self.handle.release();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    fn query(&self, op: ControlOp) -> Result<u32> {
        control::perform(&self.handle, op, 0).map(ControlReply::value)
    }

    /// Driver version, e.g. `2.1`.
    pub fn driver_version(&self) -> Result<f64> {
        self.query(ControlOp::GetDriverVersion)
            .map(driver_version_from_raw)
    }

    /// Number of cards the driver manages.
    pub fn card_count(&self) -> Result<u32> {
        self.query(ControlOp::GetCardCount)
    }

    pub fn board_version(&self) -> Result<u32> {
        self.query(ControlOp::GetBoardVersion)
    }

    /// Modules physically present on the board.
    pub fn modules_mask(&self) -> Result<ModuleMask> {
        self.query(ControlOp::GetModulesMask)
            .map(ModuleMask::from_raw)
    }

    /// Modules currently working.
    pub fn modules_status(&self) -> Result<ModuleMask> {
        self.query(ControlOp::GetModulesStatus)
            .map(ModuleMask::from_raw)
    }

    /// Number of working modules (0-4).
    pub fn modules_count(&self) -> Result<u32> {
        self.modules_status().map(ModuleMask::count)
    }

    /// Bytes per second the working modules deliver.
    pub fn modules_data_rate(&self) -> Result<u32> {
        self.modules_count().map(|n| n * MODULE_DATA_RATE)
    }

    pub fn pci_info(&self) -> Result<PciLocation> {
        self.query(ControlOp::GetPciBusDeviceId)
            .map(PciLocation::from_raw)
    }

    /// Check that every working module is also present.
    ///
    /// Returns `false` and logs a warning when the status reports a module the
    /// mask does not. Neither value is altered.
    pub fn check_modules_consistency(&self) -> Result<bool> {
        let mask = self.modules_mask()?;
        let status = self.modules_status()?;
        let consistent = status.is_subset_of(mask);
        if !consistent {
            log::warn!(
                "{}: modules status {status} not a subset of mask {mask}",
                self.device_path().display()
            );
        }
        Ok(consistent)
    }

    /// Snapshot of every query.
    pub fn device_info(&self) -> Result<DeviceInfo> {
        let modules_status = self.modules_status()?;
        Ok(DeviceInfo {
            device_type: self.device_type(),
            device_number: self.device_number(),
            device_path: self.device_path().display().to_string(),
            driver_version: self.driver_version()?,
            board_version: self.board_version()?,
            card_count: self.card_count()?,
            modules_mask: self.modules_mask()?,
            modules_status,
            modules_count: modules_status.count(),
            modules_data_rate: modules_status.count() * MODULE_DATA_RATE,
            pci: self.pci_info()?,
        })
    }

    // -----------------------------------------------------------------------
    // Control
    // -----------------------------------------------------------------------

    /// Reset the board. Changes hardware state.
    pub fn reset_board(&self) -> Result<()> {
        control::perform(&self.handle, ControlOp::ResetBoard, 0).map(|_| ())
    }

    pub fn enable_module(&self, module: u8) -> Result<()> {
        self.module_command(ControlOp::EnableModule, module)
    }

    pub fn disable_module(&self, module: u8) -> Result<()> {
        self.module_command(ControlOp::DisableModule, module)
    }

    fn module_command(&self, op: ControlOp, module: u8) -> Result<()> {
        if module >= MAX_MODULES {
            return Err(QuantixError::invalid(format!(
                "module number must be 0-{}, got {module}",
                MAX_MODULES - 1
            )));
        }
        control::perform(&self.handle, op, u32::from(module)).map(|_| ())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Exactly `size` random bytes.
    pub fn read(&self, size: usize) -> Result<Vec<u8>> {
        reader::read_raw(&self.handle, size)
    }

    /// Random `u16` (2 bytes).
    pub fn read_short(&self) -> Result<u16> {
        reader::read_u16(&self.handle)
    }

    /// Random `u32` (4 bytes).
    pub fn read_int(&self) -> Result<u32> {
        reader::read_u32(&self.handle)
    }

    /// Random `f32` in `[0, 1)` (4 bytes).
    pub fn read_float(&self) -> Result<f32> {
        reader::read_f32(&self.handle)
    }

    /// Random `f64` in `[0, 1)` (8 bytes).
    pub fn read_double(&self) -> Result<f64> {
        reader::read_f64(&self.handle)
    }

    /// Random integer in `[min, max]` (4 bytes, modulo reduced).
    pub fn read_int_range(&self, min: i64, max: i64) -> Result<i64> {
        reader::read_bounded(&self.handle, min, max)
    }

    /// Random `f64` in `[min, max)` (8 bytes).
    pub fn read_scaled(&self, min: f64, max: f64) -> Result<f64> {
        reader::read_scaled(&self.handle, min, max)
    }

    /// `size` random bytes as a list of values 0-255.
    pub fn read_bytes_list(&self, size: usize) -> Result<Vec<u8>> {
        reader::read_byte_list(&self.handle, size)
    }
}

impl std::fmt::Display for Quantix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Quantix(device_type={}, device_number={})",
            self.device_type(),
            self.device_number()
        )
    }
}

/// Scoped acquisition of a [`Quantix`]. Releases the device when dropped,
/// on every exit path.
#[derive(Debug)]
pub struct OpenDevice<'a> {
    device: &'a mut Quantix,
}

impl Deref for OpenDevice<'_> {
    type Target = Quantix;

    fn deref(&self) -> &Quantix {
        self.device
    }
}

impl DerefMut for OpenDevice<'_> {
    fn deref_mut(&mut self) -> &mut Quantix {
        self.device
    }
}

impl Drop for OpenDevice<'_> {
    fn drop(&mut self) {
        self.device.close();
    }
}
