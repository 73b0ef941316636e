use quantix_core::{DeviceInfo, MAX_MODULES};

pub fn run(prefix: &str, index: u32, json: bool) -> quantix_core::Result<()> {
    let mut qrng = super::bind(prefix, index)?;
    let dev = qrng.open()?;
    let info = dev.device_info()?;
    let consistent = dev.check_modules_consistency()?;

    if json {
        match to_json(&info) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error serializing device info: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", render(&info));
        if !consistent {
            println!("\n  \u{26A0} status is not a subset of mask: check the board");
        }
    }
    Ok(())
}

fn to_json(info: &DeviceInfo) -> serde_json::Result<String> {
    serde_json::to_string_pretty(info)
}

fn render(info: &DeviceInfo) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Device:          {} #{} ({})\n",
        info.device_type, info.device_number, info.device_path
    ));
    out.push_str(&format!("Driver version:  {:.1}\n", info.driver_version));
    out.push_str(&format!("Board version:   {}\n", info.board_version));
    out.push_str(&format!("Cards:           {}\n", info.card_count));
    out.push_str(&format!("PCI bus:device:  {}\n", info.pci));
    out.push_str(&format!(
        "Modules:         {} working, {} present\n",
        info.modules_count,
        info.modules_mask.count()
    ));
    for module in 0..MAX_MODULES {
        let present = info.modules_mask.contains(module);
        let working = info.modules_status.contains(module);
        let state = match (present, working) {
            (true, true) => "\u{2713} working",
            (true, false) => "\u{2717} not working",
            (false, true) => "? working but absent from mask",
            (false, false) => "- absent",
        };
        out.push_str(&format!("  module {module}:      {state}\n"));
    }
    out.push_str(&format!(
        "Data rate:       {} bytes/s ({:.1} Mbit/s)\n",
        info.modules_data_rate,
        f64::from(info.modules_data_rate) * 8.0 / 1_000_000.0
    ));
    out
}
