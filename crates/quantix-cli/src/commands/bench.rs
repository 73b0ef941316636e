use std::time::Instant;

use quantix_core::Quantix;

const BLOCK_SIZES: &[usize] = &[16, 64, 256, 1024, 4096];

pub fn run(prefix: &str, index: u32, iterations: usize) -> quantix_core::Result<()> {
    let iterations = iterations.max(1);
    let mut qrng = super::bind(prefix, index)?;
    println!("Device: {qrng}");
    let dev = qrng.open()?;
    match dev.modules_data_rate() {
        Ok(rate) => println!("Nominal data rate: {rate} bytes/s"),
        Err(e) => log::warn!("data rate unavailable: {e}"),
    }
    println!();

    println!("read() by block size ({iterations} iterations each):");
    for &block in BLOCK_SIZES {
        let t0 = Instant::now();
        let mut total = 0usize;
        for _ in 0..iterations {
            total += dev.read(block)?.len();
        }
        let elapsed = t0.elapsed().as_secs_f64();
        println!(
            "  Block size {block:5} bytes: {:>10.2} KB/s",
            throughput_kib(total, elapsed)
        );
    }
    println!();

    type Reader = fn(&Quantix) -> quantix_core::Result<()>;
    let readers: [(&str, Reader); 6] = [
        ("read_int()", |q| q.read_int().map(|_| ())),
        ("read_short()", |q| q.read_short().map(|_| ())),
        ("read_float()", |q| q.read_float().map(|_| ())),
        ("read_double()", |q| q.read_double().map(|_| ())),
        ("read_int_range(0, 100)", |q| q.read_int_range(0, 100).map(|_| ())),
        ("read_scaled(0.0, 1.0)", |q| q.read_scaled(0.0, 1.0).map(|_| ())),
    ];

    println!(
        "{:<25} {:>10} {:>14}",
        "Method", "Time", "Ops/sec"
    );
    println!("{}", "-".repeat(51));
    for (name, reader) in readers {
        let t0 = Instant::now();
        for _ in 0..iterations {
            reader(&*dev)?;
        }
        let elapsed = t0.elapsed().as_secs_f64();
        println!(
            "{:<25} {:>9.3}s {:>14.2}",
            name,
            elapsed,
            ops_per_sec(iterations, elapsed)
        );
    }
    Ok(())
}

fn throughput_kib(bytes: usize, secs: f64) -> f64 {
    if secs <= 0.0 {
        return 0.0;
    }
    bytes as f64 / secs / 1024.0
}

fn ops_per_sec(ops: usize, secs: f64) -> f64 {
    if secs <= 0.0 {
        return 0.0;
    }
    ops as f64 / secs
}
