//! `imgstash du` – size of a directory's direct entries.

use anyhow::Result;
use imgstash_core::size::{directory_size, format_byte_count};
use std::path::Path;

pub fn run_du(dir: &Path, si: bool) -> Result<()> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "not a directory, reporting 0");
    }
    println!("{}", du_line(dir, si));
    Ok(())
}

/// `<bytes> <human> <dir>` in fixed-width columns.
pub fn du_line(dir: &Path, si: bool) -> String {
    let bytes = directory_size(dir);
    format!("{:<12} {:<10} {}", bytes, format_byte_count(bytes, si), dir.display())
}
