//! Resource descriptors and the openers that turn a link into a byte stream.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::error::{Result, TransferError};
use crate::http::{HttpOpener, HttpOptions};

/// A remote piece of content: the link to fetch plus an optional display title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub link: String,
    pub title: Option<String>,
}

impl ResourceDescriptor {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// True if the link is non-empty once surrounding whitespace is ignored.
    pub fn has_link(&self) -> bool {
        !self.link.trim().is_empty()
    }
}

/// Opens a readable stream for a resource link.
pub trait ResourceOpener {
    fn open(&self, link: &str) -> Result<Box<dyn Read + Send>>;
}

/// Opens `file://` URLs and plain paths from the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileOpener;

impl ResourceOpener for FileOpener {
    fn open(&self, link: &str) -> Result<Box<dyn Read + Send>> {
        let path = local_path(link)?;
        let file = File::open(&path).map_err(|e| TransferError::io(&path, e))?;
        Ok(Box::new(file))
    }
}

/// Resolves a `file://` URL or a bare path to a local path.
pub(crate) fn local_path(link: &str) -> Result<PathBuf> {
    match url::Url::parse(link) {
        Ok(u) if u.scheme() == "file" => u.to_file_path().map_err(|_| TransferError::InvalidLink {
            link: link.to_string(),
        }),
        Ok(u) if !is_drive_letter(u.scheme()) => Err(TransferError::UnsupportedScheme {
            scheme: u.scheme().to_string(),
        }),
        _ => Ok(PathBuf::from(link)),
    }
}

// `C:\foo` parses as scheme "c".
fn is_drive_letter(scheme: &str) -> bool {
    scheme.len() == 1
}

/// Dispatches by scheme: http(s) through curl, everything local through [`FileOpener`].
#[derive(Debug, Clone, Default)]
pub struct DefaultOpener {
    http: HttpOpener,
}

impl DefaultOpener {
    pub fn new(options: HttpOptions) -> Self {
        Self {
            http: HttpOpener::new(options),
        }
    }
}

impl ResourceOpener for DefaultOpener {
    fn open(&self, link: &str) -> Result<Box<dyn Read + Send>> {
        match url::Url::parse(link) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => self.http.open(link),
            _ => FileOpener.open(link),
        }
    }
}
