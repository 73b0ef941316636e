pub fn run(prefix: &str, index: u32, count: usize) -> quantix_core::Result<()> {
    let mut qrng = super::bind(prefix, index)?;
    println!("Device: {qrng}");
    println!("Device path: {}", qrng.device_path().display());
    println!();

    let dev = qrng.open()?;

    let bytes = dev.read(16)?;
    println!("16 random bytes:");
    println!("  Hex:  {}", super::to_hex(&bytes));
    println!("  List: {bytes:?}");
    println!();

    println!("{count} random integers (0-100):");
    for _ in 0..count {
        println!("  {}", dev.read_int_range(0, 100)?);
    }
    println!();

    println!("{count} random floats [0.0, 1.0):");
    for _ in 0..count {
        println!("  {:.10}", dev.read_float()?);
    }
    println!();

    println!("{count} random doubles [0.0, 1.0):");
    for _ in 0..count {
        println!("  {:.15}", dev.read_double()?);
    }
    println!();

    println!("Random 16-bit integer: {}", dev.read_short()?);
    println!("Random 32-bit integer: {}", dev.read_int()?);
    Ok(())
}
