//! Directory sizes and human-readable byte counts.

use std::fs;
use std::path::Path;

/// Sum of the reported lengths of the direct entries of `dir`.
///
/// Not recursive: a nested directory contributes its own entry length only.
/// Returns 0 when `dir` is not a directory or cannot be listed.
pub fn directory_size(dir: &Path) -> u64 {
    if !dir.is_dir() {
        return 0;
    }
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), "cannot list directory: {}", e);
            return 0;
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let path = entry.path();
            // Follow links; a dangling link counts as the link itself.
            match fs::metadata(&path).or_else(|_| fs::symlink_metadata(&path)) {
                Ok(meta) => meta.len(),
                Err(e) => {
                    tracing::debug!(path = %path.display(), "skipping entry: {}", e);
                    0
                }
            }
        })
        .sum()
}

/// Formats `bytes` as e.g. `"1.5 kB"` (SI, base 1000) or `"1.5 KiB"` (binary, base 1024).
/// Values below one unit are printed verbatim: `"999 B"`, and `0` gives `"0 B"`.
/// The single decimal is rounded half-up (`1250` SI gives `"1.3 kB"`).
pub fn format_byte_count(bytes: u64, si: bool) -> String {
    let unit: u64 = if si { 1000 } else { 1024 };
    if bytes < unit {
        return format!("{bytes} B");
    }

    let mut exp = 0usize;
    let mut scaled = bytes;
    while scaled >= unit {
        scaled /= unit;
        exp += 1;
    }

    let prefixes = if si { "kMGTPE" } else { "KMGTPE" };
    let prefix = &prefixes[exp - 1..exp];
    let suffix = if si { "" } else { "i" };
    let divisor = u128::from(unit).pow(exp as u32);
    let tenths = (u128::from(bytes) * 10 + divisor / 2) / divisor;
    format!("{}.{} {prefix}{suffix}B", tenths / 10, tenths % 10)
}

/// Signed variant; negative counts are clamped to `"0 B"`.
pub fn format_signed_byte_count(bytes: i64, si: bool) -> String {
    format_byte_count(u64::try_from(bytes).unwrap_or(0), si)
}
