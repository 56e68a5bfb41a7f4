//! Random dotted-quad input generator.
//!
//! Produces files in the format the counter consumes: one IPv4 address per
//! line, each octet uniform in `0..=255`.

use rand::Rng;
use std::io::{self, Write};

/// Bytes per megabyte as used by the `ipgen` size argument.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Target size used when `ipgen` gets no valid size.
pub const DEFAULT_SIZE_MB: u64 = 10;

/// Write one random address followed by `\n`. Returns the bytes written.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_random_ip<W: Write, R: Rng>(writer: &mut W, rng: &mut R) -> io::Result<u64> {
    let octets: [u8; 4] = rng.gen();
    let mut line = [0u8; 16];
    let mut cursor = io::Cursor::new(&mut line[..]);
    writeln!(
        cursor,
        "{}.{}.{}.{}",
        octets[0], octets[1], octets[2], octets[3]
    )?;
    let len = cursor.position() as usize;
    writer.write_all(&line[..len])?;
    Ok(len as u64)
}

/// Write random addresses until at least `target_bytes` have been written.
///
/// The last line is always complete, so the result may overshoot the target by
/// up to 15 bytes. Returns the total byte count.
///
/// # Errors
///
/// Propagates write failures.
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut out = Vec::new();
/// let mut rng = StdRng::seed_from_u64(7);
/// let written = ipcount::generator::write_random_ips(&mut out, &mut rng, 1_000).unwrap();
///
/// assert_eq!(written, out.len() as u64);
/// assert!(written >= 1_000 && written < 1_016);
/// ```
pub fn write_random_ips<W: Write, R: Rng>(
    writer: &mut W,
    rng: &mut R,
    target_bytes: u64,
) -> io::Result<u64> {
    let mut written = 0;
    while written < target_bytes {
        written += write_random_ip(writer, rng)?;
    }
    writer.flush()?;

    tracing::debug!(written, target_bytes, "generated input");
    Ok(written)
}

/// Parse the `ipgen` size argument, in megabytes.
///
/// Returns `None` for anything that is not a positive integer, or whose byte
/// count does not fit in a `u64`.
#[must_use]
pub fn parse_size_mb(value: &str) -> Option<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|&mb| mb > 0 && mb.checked_mul(BYTES_PER_MB).is_some())
}
