use std::io::Write;

/// Upper bound on a single device read.
const MAX_CHUNK: usize = 1 << 20;

pub fn run(
    prefix: &str,
    index: u32,
    format: &str,
    n_bytes: usize,
    chunk: usize,
) -> quantix_core::Result<()> {
    let mut qrng = super::bind(prefix, index)?;
    let dev = qrng.open()?;
    let chunk_size = chunk_size_for(format, chunk);
    let mut total = 0usize;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    loop {
        if n_bytes > 0 && total >= n_bytes {
            break;
        }
        let want = if n_bytes == 0 {
            chunk_size
        } else {
            chunk_size.min(n_bytes - total)
        };

        let data = dev.read(want)?;

        let write_result = match format {
            "hex" => out.write_all(super::to_hex(&data).as_bytes()),
            "base64" => out.write_all(base64_encode(&data).as_bytes()),
            _ => out.write_all(&data),
        };

        if write_result.is_err() {
            log::debug!("stdout closed after {total} bytes");
            break;
        }
        let _ = out.flush();

        total += data.len();
    }

    if format != "raw" {
        let _ = writeln!(out);
    }
    Ok(())
}

/// Per-read size for `format`. Base64 chunks stay on 3-byte boundaries so
/// padding only ever appears at the very end of the stream.
fn chunk_size_for(format: &str, chunk: usize) -> usize {
    let size = chunk.clamp(1, MAX_CHUNK);
    if format == "base64" {
        (size - size % 3).max(3)
    } else {
        size
    }
}

fn base64_encode(data: &[u8]) -> String {
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut result = String::with_capacity(data.len().div_ceil(3) * 4);
    for chunk in data.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
        let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
        let triple = (b0 << 16) | (b1 << 8) | b2;
        result.push(CHARS[((triple >> 18) & 0x3F) as usize] as char);
        result.push(CHARS[((triple >> 12) & 0x3F) as usize] as char);
        result.push(if chunk.len() > 1 {
            CHARS[((triple >> 6) & 0x3F) as usize] as char
        } else {
            '='
        });
        result.push(if chunk.len() > 2 {
            CHARS[(triple & 0x3F) as usize] as char
        } else {
            '='
        });
    }
    result
}
