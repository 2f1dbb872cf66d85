//! Value formatting for the comparison table

use std::fmt::Write;
use std::time::Duration;

const BINARY_PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Format a byte count with binary prefixes: `512 B`, `1.5 KiB`, `3.0 GiB`
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{} B", bytes);
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!(
        "{:.1} {}iB",
        bytes as f64 / div as f64,
        BINARY_PREFIXES[exp]
    )
}

/// Round `d` to a multiple of `granularity` and render it compactly
///
/// Output looks like `0s`, `750ns`, `123µs`, `1.5ms`, `1.234s`, `2m3.456s`
/// or `1h0m5s`. Halves round away from zero.
pub fn format_duration(d: Duration, granularity: Duration) -> String {
    let unit = granularity.as_nanos().max(1);
    let nanos = (d.as_nanos() + unit / 2) / unit * unit;

    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", decimal(nanos, 1_000));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", decimal(nanos, 1_000_000));
    }

    let hours = nanos / 3_600_000_000_000;
    let minutes = (nanos / 60_000_000_000) % 60;
    let seconds = nanos % 60_000_000_000;

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{}h", hours);
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{}m", minutes);
    }
    let _ = write!(out, "{}s", decimal(seconds, 1_000_000_000));
    out
}

/// `value / scale` with trailing fractional zeros removed
fn decimal(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let width = scale.to_string().len() - 1;
    let digits = format!("{:0width$}", frac, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
