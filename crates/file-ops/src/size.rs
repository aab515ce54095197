//! Human-readable file sizes.

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Formats a byte count with base-1024 units and one decimal digit.
///
/// Anything of 1024 GB or more is expressed in TB, however large.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{value:.1} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1} TB")
}
