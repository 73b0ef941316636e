use quantix_core::{DeviceType, count_devices_with_prefix, device_path, list_devices_with_prefix};

pub fn run(prefix: &str) {
    let pci = count_devices_with_prefix(prefix, DeviceType::Pci);
    let usb = count_devices_with_prefix(prefix, DeviceType::Usb);

    println!("PCI devices: {pci}");
    println!("USB devices: {usb} (not supported)");
    println!();

    if pci == 0 {
        println!("No Quantis devices found under {prefix}* (is the driver loaded?)");
        return;
    }

    for index in list_devices_with_prefix(prefix) {
        println!(
            "  \u{2705} {:<4} {}",
            index,
            device_path(prefix, index).display()
        );
    }
}
