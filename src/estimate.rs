//! Output size estimation and size formatting.
//!
//! The estimate is display guidance only; actual output is never checked
//! against it.

use crate::options::{CompressionLevel, CompressionOptions};

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Estimated compressed size in bytes.
///
/// `original × base(level) × (0.5 + quality/100 × 0.5)`, rounded to the
/// nearest byte.
pub fn estimate_size(original: u64, level: CompressionLevel, quality: u8) -> u64 {
    let quality_factor = 0.5 + f64::from(quality) / 100.0 * 0.5;
    (original as f64 * level.base_ratio() * quality_factor).round() as u64
}

/// [`estimate_size`] for a set of options.
pub fn estimate_for(original: u64, options: &CompressionOptions) -> u64 {
    estimate_size(original, options.level, options.quality)
}

/// Human-readable size: "0 Bytes", "512 Bytes", "1.5 KB", "2.34 MB".
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}
