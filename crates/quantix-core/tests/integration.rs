//! Integration tests for quantix-core.
//!
//! Fixture tests stand in a regular file for the device node: discovery,
//! construction, open/read/close and short reads behave exactly as against the
//! real character device. Control operations on a regular file fail with
//! ENOTTY, which exercises the error path.
//!
//! Tests marked `#[ignore]` need a Quantis PCI board at `/dev/qrandom0`
//! (or under `QUANTIX_DEVICE_PREFIX`).

use std::path::Path;

use quantix_core::{
    DeviceType, ModuleMask, Quantix, QuantixError, count_devices, count_devices_with_prefix,
};

/// Temp dir holding `qrandom0` with the given contents.
fn fixture(contents: &[u8]) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("qrandom0"), contents).unwrap();
    let prefix = format!("{}/qrandom", dir.path().display());
    (dir, prefix)
}

/// A deterministic stand-in for device output.
fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 37 + 11) as u8).collect()
}

// ---------------------------------------------------------------------------
// Fixture-backed
// ---------------------------------------------------------------------------

#[test]
fn example_scenario_end_to_end() {
    let (_dir, prefix) = fixture(&pattern(16 + 4 * 100));
    assert_eq!(count_devices_with_prefix(&prefix, DeviceType::Pci), 1);

    let mut qrng = Quantix::with_prefix(&prefix, DeviceType::Pci, 0).unwrap();
    {
        let dev = qrng.open().unwrap();
        assert_eq!(dev.read(16).unwrap().len(), 16);
        for _ in 0..100 {
            let v = dev.read_int_range(10, 20).unwrap();
            assert!((10..=20).contains(&v), "{v} out of range");
        }
    }
    let err = qrng.read(16).unwrap_err();
    assert!(matches!(err, QuantixError::NotOpen { .. }));
    // Use after release is a caller error, not a device failure.
    assert!(!err.is_device_failure());
}

#[test]
fn construct_missing_node_fails_not_found() {
    let (_dir, prefix) = fixture(b"");
    for index in [1, 2, 999] {
        let err = Quantix::with_prefix(&prefix, DeviceType::Pci, index).unwrap_err();
        match err {
            QuantixError::NotFound { path } => {
                assert!(path.to_string_lossy().ends_with(&format!("qrandom{index}")));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}

#[test]
fn construct_existing_node_does_not_open() {
    let (_dir, prefix) = fixture(b"");
    let q = Quantix::with_prefix(&prefix, DeviceType::Pci, 0).unwrap();
    assert!(!q.is_open());
    assert_eq!(q.device_number(), 0);
    assert_eq!(q.device_type(), DeviceType::Pci);
    assert_eq!(
        q.device_path(),
        Path::new(&format!("{prefix}0"))
    );
}

#[test]
fn usb_is_rejected_at_construction() {
    let (_dir, prefix) = fixture(b"");
    assert!(matches!(
        Quantix::with_prefix(&prefix, DeviceType::Usb, 0),
        Err(QuantixError::Unsupported {
            device_type: DeviceType::Usb
        })
    ));
}

#[test]
fn typed_reads_consume_documented_byte_counts() {
    let data = pattern(2 + 4 + 4 + 8 + 4 + 8 + 5);
    let (_dir, prefix) = fixture(&data);
    let mut qrng = Quantix::with_prefix(&prefix, DeviceType::Pci, 0).unwrap();
    let dev = qrng.open().unwrap();

    let short = dev.read_short().unwrap();
    assert_eq!(short, u16::from_ne_bytes([data[0], data[1]]));

    let int = dev.read_int().unwrap();
    assert_eq!(int, u32::from_ne_bytes(data[2..6].try_into().unwrap()));

    let float = dev.read_float().unwrap();
    assert!((0.0..1.0).contains(&float));

    let double = dev.read_double().unwrap();
    assert!((0.0..1.0).contains(&double));
    let raw = u64::from_ne_bytes(data[10..18].try_into().unwrap());
    assert_eq!(double, raw as f64 / 18_446_744_073_709_551_616.0);

    let ranged = dev.read_int_range(-3, 3).unwrap();
    let raw = u32::from_ne_bytes(data[18..22].try_into().unwrap());
    assert_eq!(ranged, -3 + i64::from(raw % 7));

    let scaled = dev.read_scaled(5.0, 10.0).unwrap();
    assert!((5.0..10.0).contains(&scaled));

    assert_eq!(dev.read_bytes_list(5).unwrap(), data[30..35].to_vec());

    // Stream is exhausted: exactly the documented bytes were consumed.
    assert!(matches!(
        dev.read(1),
        Err(QuantixError::ShortRead {
            requested: 1,
            actual: 0,
            ..
        })
    ));
}

#[test]
fn short_read_reports_counts_and_is_not_retried() {
    let (_dir, prefix) = fixture(&[7u8; 3]);
    let mut qrng = Quantix::with_prefix(&prefix, DeviceType::Pci, 0).unwrap();
    let dev = qrng.open().unwrap();

    match dev.read(16) {
        Err(QuantixError::ShortRead {
            requested, actual, ..
        }) => {
            assert_eq!(requested, 16);
            assert_eq!(actual, 3);
        }
        other => panic!("expected ShortRead, got {other:?}"),
    }
}

#[test]
fn zero_size_read_is_invalid_argument() {
    let (_dir, prefix) = fixture(&[1u8; 4]);
    let mut qrng = Quantix::with_prefix(&prefix, DeviceType::Pci, 0).unwrap();
    // Rejected before the handle state is even consulted.
    assert!(matches!(qrng.read(0), Err(QuantixError::InvalidArgument(_))));

    let dev = qrng.open().unwrap();
    assert!(matches!(dev.read(0), Err(QuantixError::InvalidArgument(_))));
    // No bytes were consumed by the rejected call.
    assert_eq!(dev.read(4).unwrap(), vec![1u8; 4]);
}

#[test]
fn unallocatable_size_is_invalid_argument() {
    let (_dir, prefix) = fixture(&[5u8; 8]);
    let mut qrng = Quantix::with_prefix(&prefix, DeviceType::Pci, 0).unwrap();
    assert!(matches!(
        qrng.read(usize::MAX),
        Err(QuantixError::InvalidArgument(_))
    ));

    let dev = qrng.open().unwrap();
    for n in [usize::MAX, isize::MAX as usize + 1] {
        assert!(matches!(dev.read(n), Err(QuantixError::InvalidArgument(_))));
        assert!(matches!(
            dev.read_bytes_list(n),
            Err(QuantixError::InvalidArgument(_))
        ));
    }
    assert_eq!(dev.read(8).unwrap(), vec![5u8; 8]);
}

#[test]
fn inverted_ranges_are_invalid_argument() {
    let (_dir, prefix) = fixture(&[0u8; 16]);
    let mut qrng = Quantix::with_prefix(&prefix, DeviceType::Pci, 0).unwrap();
    let dev = qrng.open().unwrap();

    assert!(matches!(
        dev.read_int_range(20, 10),
        Err(QuantixError::InvalidArgument(_))
    ));
    assert!(matches!(
        dev.read_scaled(1.0, 0.0),
        Err(QuantixError::InvalidArgument(_))
    ));
    assert!(matches!(
        dev.read_scaled(f64::NAN, 1.0),
        Err(QuantixError::InvalidArgument(_))
    ));
    // Nothing consumed by the rejected calls.
    assert_eq!(dev.read(16).unwrap().len(), 16);
}

#[test]
fn single_value_range_consumes_four_bytes() {
    let (_dir, prefix) = fixture(&[0xFFu8; 8]);
    let mut qrng = Quantix::with_prefix(&prefix, DeviceType::Pci, 0).unwrap();
    let dev = qrng.open().unwrap();
    assert_eq!(dev.read_int_range(42, 42).unwrap(), 42);
    assert_eq!(dev.read_int_range(42, 42).unwrap(), 42);
    assert!(matches!(dev.read(1), Err(QuantixError::ShortRead { .. })));
}

#[test]
fn control_ops_on_non_device_report_device_io() {
    let (_dir, prefix) = fixture(b"");
    let mut qrng = Quantix::with_prefix(&prefix, DeviceType::Pci, 0).unwrap();
    let dev = qrng.open().unwrap();

    let err = dev.driver_version().unwrap_err();
    assert!(err.is_device_failure());
    assert_eq!(err.device_path(), Some(dev.device_path()));
    assert!(matches!(err, QuantixError::DeviceIo { .. }));

    assert!(matches!(dev.reset_board(), Err(QuantixError::DeviceIo { .. })));
    assert!(matches!(
        dev.enable_module(0),
        Err(QuantixError::DeviceIo { .. })
    ));
    assert!(matches!(
        dev.enable_module(4),
        Err(QuantixError::InvalidArgument(_))
    ));
}

#[test]
fn reacquire_after_release() {
    let (_dir, prefix) = fixture(&pattern(8));
    let mut qrng = Quantix::with_prefix(&prefix, DeviceType::Pci, 0).unwrap();

    let first = qrng.open().unwrap().read(4).unwrap();
    qrng.close();
    let second = qrng.open().unwrap().read(4).unwrap();
    // A fresh open starts a fresh stream on a regular file.
    assert_eq!(first, second);
    assert!(!qrng.is_open());
}

#[test]
fn device_info_serializes() {
    let info = quantix_core::DeviceInfo {
        device_type: DeviceType::Pci,
        device_number: 0,
        device_path: "/dev/qrandom0".to_string(),
        driver_version: 2.1,
        board_version: 5,
        card_count: 1,
        modules_mask: ModuleMask::from_raw(0b1111),
        modules_status: ModuleMask::from_raw(0b0111),
        modules_count: 3,
        modules_data_rate: 1_500_000,
        pci: quantix_core::PciLocation::from_raw(0x0002_0000),
    };
    let json: serde_json::Value = serde_json::to_value(&info).unwrap();
    assert_eq!(json["device_type"], "Pci");
    assert_eq!(json["modules_mask"], 15);
    assert_eq!(json["pci"]["bus"], 2);
    assert_eq!(json["pci"]["device"], 0);
}

// ---------------------------------------------------------------------------
// Hardware
// ---------------------------------------------------------------------------

/// Open device 0, or `None` when no board is installed.
fn hardware() -> Option<Quantix> {
    if count_devices(DeviceType::Pci) == 0 {
        eprintln!("no Quantis PCI device present; skipping");
        return None;
    }
    Some(Quantix::new(DeviceType::Pci, 0).unwrap())
}

#[test]
#[ignore] // Run with: cargo test -- --ignored
fn hardware_queries_are_sane() {
    let Some(mut qrng) = hardware() else { return };
    let dev = qrng.open().unwrap();

    let version = dev.driver_version().unwrap();
    assert!(version > 0.0 && version < 100.0, "driver version {version}");
    assert!(dev.board_version().unwrap() > 0);
    assert!(dev.card_count().unwrap() >= 1);

    let mask = dev.modules_mask().unwrap();
    let status = dev.modules_status().unwrap();
    assert!(mask.raw() <= 15, "mask {mask}");
    assert!(status.raw() <= 15, "status {status}");
    assert!(
        status.is_subset_of(mask),
        "hardware reports status {status} outside mask {mask}"
    );
    assert!(dev.check_modules_consistency().unwrap());
    assert!(dev.modules_count().unwrap() <= 4);

    let _ = dev.pci_info().unwrap();
    let info = dev.device_info().unwrap();
    assert_eq!(info.modules_count, status.count());
}

#[test]
#[ignore] // Run with: cargo test -- --ignored
fn hardware_reads_are_in_range() {
    let Some(mut qrng) = hardware() else { return };
    let dev = qrng.open().unwrap();

    assert_eq!(dev.read(1024).unwrap().len(), 1024);
    for _ in 0..100 {
        assert!((0.0..1.0).contains(&dev.read_float().unwrap()));
        assert!((0.0..1.0).contains(&dev.read_double().unwrap()));
        assert!((10..=20).contains(&dev.read_int_range(10, 20).unwrap()));
    }
    assert_eq!(dev.read_int_range(42, 42).unwrap(), 42);
}

#[test]
#[ignore] // Run with: cargo test -- --ignored
fn hardware_output_not_constant() {
    let Some(mut qrng) = hardware() else { return };
    let dev = qrng.open().unwrap();
    let a = dev.read(256).unwrap();
    let b = dev.read(256).unwrap();
    assert_ne!(a, b, "two consecutive reads returned identical data");
}

#[test]
#[ignore] // Run with: cargo test -- --ignored
fn hardware_reset_and_module_toggle() {
    let Some(mut qrng) = hardware() else { return };
    let dev = qrng.open().unwrap();

    dev.reset_board().unwrap();
    assert_eq!(dev.read(4).unwrap().len(), 4);

    if dev.modules_status().unwrap().contains(0) {
        dev.disable_module(0).unwrap();
    }
    dev.enable_module(0).unwrap();
    assert_eq!(dev.read(4).unwrap().len(), 4);
}
