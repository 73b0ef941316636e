pub fn reset(prefix: &str, index: u32) -> quantix_core::Result<()> {
    let mut qrng = super::bind(prefix, index)?;
    let dev = qrng.open()?;
    dev.reset_board()?;
    println!("Board {} reset.", dev.device_path().display());
    Ok(())
}

pub fn module(prefix: &str, index: u32, module: u8, enable: bool) -> quantix_core::Result<()> {
    let mut qrng = super::bind(prefix, index)?;
    let dev = qrng.open()?;
    if enable {
        dev.enable_module(module)?;
    } else {
        dev.disable_module(module)?;
    }
    let status = dev.modules_status()?;
    println!(
        "Module {module} {}. Modules status: {status} ({} working)",
        if enable { "enabled" } else { "disabled" },
        status.count()
    );
    Ok(())
}
