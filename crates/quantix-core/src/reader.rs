//! Entropy reader: raw device reads and their typed interpretations.
//!
//! Every typed reader is built on [`read_raw`] and consumes a fixed number of
//! fresh bytes. Nothing is buffered between calls.
//!
//! | Reader            | Bytes | Interpretation                         |
//! |-------------------|-------|----------------------------------------|
//! | `read_u16`        | 2     | native-endian `u16`                    |
//! | `read_u32`        | 4     | native-endian `u32`                    |
//! | `read_f32`        | 4     | `u32 / 2^32`, in `[0, 1)`              |
//! | `read_f64`        | 8     | `u64 / 2^64`, in `[0, 1)`              |
//! | `read_bounded`    | 4     | `min + u32 % (max - min + 1)`          |
//! | `read_scaled`     | 8     | `(1 - f64) * min + f64 * max`          |
//!
//! The bounded reduction is a plain modulo. When the range size does not
//! divide 2^32 the low values are very slightly favoured; this is accepted
//! and kept for output compatibility.

use std::io::Read;

use crate::error::{QuantixError, Result};
use crate::handle::DeviceHandle;

const TWO_POW_32: f64 = 4_294_967_296.0;
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Largest `f32` strictly below 1.0.
const F32_BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;
/// Largest `f64` strictly below 1.0.
const F64_BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

// ---------------------------------------------------------------------------
// Device reads
// ---------------------------------------------------------------------------

/// Read exactly `n` bytes with a single read request.
///
/// `n == 0` is rejected before the device is touched. A short read fails with
/// `ShortRead`; it is never retried or padded.
pub fn read_raw(handle: &DeviceHandle, n: usize) -> Result<Vec<u8>> {
    if n == 0 {
        return Err(QuantixError::invalid("size must be positive"));
    }
    let mut buf = Vec::new();
    buf.try_reserve_exact(n)
        .map_err(|_| QuantixError::invalid(format!("cannot allocate {n} bytes")))?;
    buf.resize(n, 0);
    let mut file = handle.file()?;
    let got = file
        .read(&mut buf)
        .map_err(|e| QuantixError::device_io(handle.path(), "read", e))?;
    log::trace!("{}: read {got}/{n} bytes", handle.path().display());
    if got != n {
        return Err(QuantixError::ShortRead {
            path: handle.path().to_path_buf(),
            requested: n,
            actual: got,
        });
    }
    Ok(buf)
}

fn read_array<const N: usize>(handle: &DeviceHandle) -> Result<[u8; N]> {
    let bytes = read_raw(handle, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

pub fn read_u16(handle: &DeviceHandle) -> Result<u16> {
    read_array(handle).map(u16::from_ne_bytes)
}

pub fn read_u32(handle: &DeviceHandle) -> Result<u32> {
    read_array(handle).map(u32::from_ne_bytes)
}

pub fn read_u64(handle: &DeviceHandle) -> Result<u64> {
    read_array(handle).map(u64::from_ne_bytes)
}

/// Single-precision fraction in `[0, 1)` from 32 bits.
pub fn read_f32(handle: &DeviceHandle) -> Result<f32> {
    read_u32(handle).map(fraction_f32)
}

/// Double-precision fraction in `[0, 1)` from 64 bits.
pub fn read_f64(handle: &DeviceHandle) -> Result<f64> {
    read_u64(handle).map(fraction_f64)
}

/// Integer in `[min, max]`, inclusive.
///
/// `min == max` still consumes four bytes and returns `min`.
pub fn read_bounded(handle: &DeviceHandle, min: i64, max: i64) -> Result<i64> {
    if min > max {
        return Err(QuantixError::invalid(format!(
            "min ({min}) must be <= max ({max})"
        )));
    }
    read_u32(handle).map(|v| bounded(v, min, max))
}

/// Double in `[min, max)`.
pub fn read_scaled(handle: &DeviceHandle, min: f64, max: f64) -> Result<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Err(QuantixError::invalid("bounds must be finite"));
    }
    if min > max {
        return Err(QuantixError::invalid(format!(
            "min ({min}) must be <= max ({max})"
        )));
    }
    read_f64(handle).map(|f| scaled(f, min, max))
}

/// `n` bytes as a list of byte values.
pub fn read_byte_list(handle: &DeviceHandle, n: usize) -> Result<Vec<u8>> {
    read_raw(handle, n)
}

// ---------------------------------------------------------------------------
// Pure conversions
// ---------------------------------------------------------------------------

/// `value / 2^32`, narrowed to `f32` without ever reaching 1.0.
pub fn fraction_f32(value: u32) -> f32 {
    let f = (f64::from(value) / TWO_POW_32) as f32;
    f.min(F32_BELOW_ONE)
}

/// `value / 2^64`, kept below 1.0 where rounding would reach it.
pub fn fraction_f64(value: u64) -> f64 {
    let f = value as f64 / TWO_POW_64;
    f.min(F64_BELOW_ONE)
}

/// Modulo reduction of `value` onto `[min, max]`. Caller ensures `min <= max`.
pub fn bounded(value: u32, min: i64, max: i64) -> i64 {
    let range = i128::from(max) - i128::from(min) + 1;
    let offset = i128::from(value) % range;
    // min + offset <= max, so the narrowing cannot overflow.
    (i128::from(min) + offset) as i64
}

/// Linear map of a `[0, 1)` fraction onto `[min, max)`.
///
/// Computed as a weighted sum so `max - min` never has to be representable;
/// the result is clamped below `max` where rounding reaches it.
pub fn scaled(fraction: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    let v = (1.0 - fraction) * min + fraction * max;
    v.max(min).min(next_below(max))
}

/// Largest `f64` strictly below finite `x`.
fn next_below(x: f64) -> f64 {
    if x == 0.0 {
        -f64::from_bits(1)
    } else if x > 0.0 {
        f64::from_bits(x.to_bits() - 1)
    } else {
        f64::from_bits(x.to_bits() + 1)
    }
}
