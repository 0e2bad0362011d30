use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::copy::DEFAULT_CHUNK_SIZE;
use crate::output::{OutputDir, DEFAULT_FOLDER_NAME};

/// Where timestamped files are created (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Shared storage root. When missing, the user's pictures directory is used.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Subdirectory created under the root.
    #[serde(default = "default_folder")]
    pub folder: String,
}

fn default_folder() -> String {
    DEFAULT_FOLDER_NAME.to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: None,
            folder: default_folder(),
        }
    }
}

/// libcurl transfer settings for remote resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds.
    pub timeout_secs: u64,
    pub max_redirects: u32,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 300,
            max_redirects: 10,
            user_agent: concat!("imgstash/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Media indexer notification. With no command, notifications are only logged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Program and leading arguments; the new file's path is appended.
    #[serde(default)]
    pub command: Option<Vec<String>>,
}

/// Global configuration loaded from `~/.config/imgstash/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StashConfig {
    /// Copy buffer size in bytes.
    pub chunk_size: usize,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

impl Default for StashConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            output: OutputConfig::default(),
            http: HttpConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

impl StashConfig {
    /// Output directory with the root resolved: configured value, then the
    /// pictures directory, then home, then the current directory.
    pub fn output_dir(&self) -> OutputDir {
        let root = self
            .output
            .root
            .clone()
            .or_else(dirs::picture_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        OutputDir::new(root, self.output.folder.clone())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgstash")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<StashConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = StashConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: StashConfig = toml::from_str(&data)?;
    Ok(cfg)
}
