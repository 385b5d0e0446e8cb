//! Settings for the mirror.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Default settings file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "webdav.json";

/// Mirror settings, read once at startup.
#[derive(Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Local directory to mirror.
    pub local_path: PathBuf,

    /// WebDAV server URL.
    pub server: String,

    /// Remote prefix the local tree is mirrored under.
    #[serde(default)]
    pub server_path: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Substring patterns; directories containing one are not watched.
    #[serde(default, rename = "ignores")]
    pub exclusions: Vec<String>,

    /// Whether to show desktop notifications.
    #[serde(default = "default_true")]
    pub notifications: bool,

    /// Whether directories created while running are checked against the
    /// exclusions before being watched.
    #[serde(default = "default_true")]
    pub exclude_created_directories: bool,
}

fn default_true() -> bool {
    true
}

impl MirrorConfig {
    /// Read and validate the settings file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings are complete enough to start watching.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.local_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing("local_path"));
        }
        if self.server.trim().is_empty() {
            return Err(ConfigError::Missing("server"));
        }
        if !self.local_path.is_dir() {
            return Err(ConfigError::NotADirectory(self.local_path.clone()));
        }

        let url = Url::parse(&self.server).map_err(|e| ConfigError::InvalidServer {
            url: self.server.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidServer {
                url: self.server.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for MirrorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MirrorConfig")
            .field("local_path", &self.local_path)
            .field("server", &self.server)
            .field("server_path", &self.server_path)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("exclusions", &self.exclusions)
            .field("notifications", &self.notifications)
            .field(
                "exclude_created_directories",
                &self.exclude_created_directories,
            )
            .finish()
    }
}
