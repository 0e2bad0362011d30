//! Saving a remote resource to a local path.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use crate::copy::copy_to_file;
use crate::error::{Result, TransferError};
use crate::resource::{ResourceDescriptor, ResourceOpener};

/// Fetches `resource` through `opener` and writes it to `destination`.
///
/// A resource without a link is rejected before the file system is touched.
/// Otherwise an existing file at `destination` is deleted first, then the body
/// is copied in `chunk_size` chunks. Returns the number of bytes written.
///
/// On failure the destination may hold a partial body; it is not cleaned up.
pub fn save_remote_resource(
    resource: &ResourceDescriptor,
    destination: &Path,
    opener: &dyn ResourceOpener,
    chunk_size: usize,
) -> Result<u64> {
    if !resource.has_link() {
        tracing::debug!(dest = %destination.display(), "resource has no link, skipping save");
        return Err(TransferError::EmptyLink);
    }

    match save_inner(resource, destination, opener, chunk_size) {
        Ok(n) => {
            tracing::info!(
                link = %resource.link,
                title = ?resource.title,
                dest = %destination.display(),
                bytes = n,
                "saved resource"
            );
            Ok(n)
        }
        Err(e) => {
            tracing::warn!(link = %resource.link, dest = %destination.display(), "error saving resource: {}", e);
            Err(e)
        }
    }
}

fn save_inner(
    resource: &ResourceDescriptor,
    destination: &Path,
    opener: &dyn ResourceOpener,
    chunk_size: usize,
) -> Result<u64> {
    remove_existing(destination)?;
    let file = File::create(destination).map_err(|e| TransferError::io(destination, e))?;
    let mut stream = opener.open(resource.link.trim())?;
    let n = copy_to_file(&mut stream, file, destination, chunk_size)?;
    Ok(n)
}

fn remove_existing(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed existing file before save");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(TransferError::io(path, e)),
    }
}
