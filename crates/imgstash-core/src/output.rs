//! Timestamp-named output files under an explicit output directory.
//!
//! Names have one-second resolution: two files allocated within the same
//! wall-clock second share a path, and the second caller reuses the first file.

use chrono::{Local, NaiveDateTime};
use std::fs::{self, File, OpenOptions};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::copy::copy_to_file;
use crate::error::{Result, TransferError};

/// Folder created under the output root when none is configured.
pub const DEFAULT_FOLDER_NAME: &str = "OpenImgur";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const FILE_EXTENSION: &str = "jpg";

/// Root of the shared storage area plus the folder new files go into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir {
    pub root: PathBuf,
    pub folder: String,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>, folder: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            folder: folder.into(),
        }
    }

    /// `root` with the default folder name.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        Self::new(root, DEFAULT_FOLDER_NAME)
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(&self.folder)
    }
}

/// `yyyyMMdd_HHmmss.jpg` for the given instant.
pub fn timestamped_file_name(at: NaiveDateTime) -> String {
    format!("{}.{}", at.format(TIMESTAMP_FORMAT), FILE_EXTENSION)
}

/// Allocates an empty file named after the current local time.
pub fn create_timestamped_file(output: &OutputDir) -> Result<PathBuf> {
    create_timestamped_file_at(output, Local::now().naive_local())
}

/// Like [`create_timestamped_file`] with an explicit timestamp.
/// An existing file with the same name is opened as-is, not truncated.
pub fn create_timestamped_file_at(output: &OutputDir, at: NaiveDateTime) -> Result<PathBuf> {
    let dir = output.path();
    let path = dir.join(timestamped_file_name(at));
    let created = fs::create_dir_all(&dir)
        .map_err(|e| TransferError::io(&dir, e))
        .and_then(|()| {
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(false)
                .open(&path)
                .map_err(|e| TransferError::io(&path, e))
        });
    match created {
        Ok(_) => {
            tracing::debug!(path = %path.display(), "allocated output file");
            Ok(path)
        }
        Err(e) => {
            tracing::warn!("error creating output file: {}", e);
            Err(e)
        }
    }
}

/// Copies `stream` into a freshly allocated timestamped file and returns its path.
pub fn copy_stream_to_new_file<R>(
    stream: &mut R,
    output: &OutputDir,
    chunk_size: usize,
) -> Result<PathBuf>
where
    R: Read + ?Sized,
{
    copy_stream_to_new_file_at(stream, output, Local::now().naive_local(), chunk_size)
}

pub fn copy_stream_to_new_file_at<R>(
    stream: &mut R,
    output: &OutputDir,
    at: NaiveDateTime,
    chunk_size: usize,
) -> Result<PathBuf>
where
    R: Read + ?Sized,
{
    let path = create_timestamped_file_at(output, at)?;
    match fill(stream, &path, chunk_size) {
        Ok(n) => {
            tracing::info!(path = %path.display(), bytes = n, "copied stream to new file");
            Ok(path)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "error copying stream to new file: {}", e);
            Err(e)
        }
    }
}

fn fill<R: Read + ?Sized>(stream: &mut R, path: &Path, chunk_size: usize) -> Result<u64> {
    let file = File::create(path).map_err(|e| TransferError::io(path, e))?;
    Ok(copy_to_file(stream, file, path, chunk_size)?)
}
