use std::io::Write;

pub fn run(prefix: &str, index: u32, n_bytes: usize, format: &str) -> quantix_core::Result<()> {
    let mut qrng = super::bind(prefix, index)?;
    let dev = qrng.open()?;
    let data = dev.read(n_bytes)?;

    match format {
        "list" => println!("{data:?}"),
        "raw" => {
            let mut out = std::io::stdout().lock();
            let _ = out.write_all(&data);
            let _ = out.flush();
        }
        _ => println!("{}", super::to_hex(&data)),
    }
    Ok(())
}
