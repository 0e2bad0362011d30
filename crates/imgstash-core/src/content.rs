//! Content resolver collaborator: turns an opaque content id into a stream.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::error::{Result, TransferError};
use crate::output::{copy_stream_to_new_file, OutputDir};
use crate::resource::local_path;

pub trait ContentResolver {
    fn open_input(&self, id: &str) -> Result<Box<dyn Read + Send>>;
}

/// Resolves `file://` URIs and plain paths on the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsContentResolver;

impl ContentResolver for FsContentResolver {
    fn open_input(&self, id: &str) -> Result<Box<dyn Read + Send>> {
        let path = local_path(id)?;
        let file = File::open(&path).map_err(|e| TransferError::io(&path, e))?;
        Ok(Box::new(file))
    }
}

/// Opens `id` through `resolver` and copies it into a new timestamped file.
/// No file is allocated when the stream cannot be opened.
pub fn import_content(
    resolver: &dyn ContentResolver,
    id: &str,
    output: &OutputDir,
    chunk_size: usize,
) -> Result<PathBuf> {
    let mut stream = resolver.open_input(id).map_err(|e| {
        tracing::warn!(id, "error opening content: {}", e);
        e
    })?;
    copy_stream_to_new_file(&mut stream, output, chunk_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn imports_local_file_into_output_dir() {
        let src_dir = tempfile::tempdir().unwrap();
        let src = src_dir.path().join("shared.png");
        fs::write(&src, b"\x89PNG....").unwrap();

        let root = tempfile::tempdir().unwrap();
        let out = OutputDir::under(root.path());
        let path = import_content(&FsContentResolver, src.to_str().unwrap(), &out, 1024).unwrap();

        assert!(path.starts_with(root.path().join("OpenImgur")));
        assert_eq!(path.extension().unwrap(), "jpg");
        assert_eq!(fs::read(&path).unwrap(), b"\x89PNG....");
    }

    #[test]
    fn file_uri_is_resolved() {
        let src = tempfile::NamedTempFile::new().unwrap();
        fs::write(src.path(), b"abc").unwrap();
        let uri = format!("file://{}", src.path().display());
        let mut stream = FsContentResolver.open_input(&uri).unwrap();
        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"abc");
    }

    #[test]
    fn missing_content_allocates_nothing() {
        let root = tempfile::tempdir().unwrap();
        let out = OutputDir::under(root.path());
        let missing = root.path().join("missing.jpg");
        let r = import_content(&FsContentResolver, missing.to_str().unwrap(), &out, 1024);
        assert!(matches!(r, Err(TransferError::Io { .. })));
        assert!(!out.path().exists());
    }
}
