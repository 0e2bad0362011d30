//! Fixed-size chunked stream copy.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// Copy buffer length used when the caller does not configure one.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Copies `reader` into `writer` one chunk at a time until EOF.
/// Returns the number of bytes copied. Does not flush `writer`.
pub fn copy_chunked<R, W>(reader: &mut R, writer: &mut W, chunk_size: usize) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }
    Ok(total)
}

/// Copies `reader` into `file` through a `BufWriter` and flushes it. The flush
/// is part of the result; the final sync and close are best effort and only logged.
pub fn copy_to_file<R>(reader: &mut R, file: File, path: &Path, chunk_size: usize) -> io::Result<u64>
where
    R: Read + ?Sized,
{
    let mut writer = BufWriter::new(file);
    let result = copy_chunked(reader, &mut writer, chunk_size)
        .and_then(|n| writer.flush().map(|()| n));

    match writer.into_inner() {
        Ok(file) => {
            if let Err(e) = file.sync_all() {
                tracing::warn!(path = %path.display(), "failed to sync file on close: {}", e);
            }
        }
        // Only reachable when the flush above already failed.
        Err(e) => {
            tracing::debug!(path = %path.display(), "dropping unflushed writer: {}", e.error());
        }
    }
    result
}
