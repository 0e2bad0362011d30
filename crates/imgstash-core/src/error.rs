//! Error type shared by the transfer operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransferError>;

#[derive(Error, Debug)]
pub enum TransferError {
    /// The resource descriptor carried no link; nothing was fetched or written.
    #[error("resource has no link")]
    EmptyLink,

    #[error("invalid resource link: {link}")]
    InvalidLink { link: String },

    #[error("unsupported link scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    /// File-system failure tied to a specific path.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Read/write failure while moving bytes between streams.
    #[error("stream error: {0}")]
    Stream(#[from] io::Error),
}

impl TransferError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TransferError::Io {
            path: path.into(),
            source,
        }
    }
}
