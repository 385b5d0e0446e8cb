//! Error types for the mirror.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for mirror operations.
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Errors that stop the mirror from starting.
#[derive(Error, Debug)]
pub enum MirrorError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote store error.
    #[error("remote store error: {0}")]
    Dav(#[from] davsync_dav_client::DavError),

    /// Directory watcher error.
    #[error("watcher error: {0}")]
    Watcher(#[from] davsync_watcher::WatcherError),
}

/// Problems with the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or lacks a required key.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required setting is empty.
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    /// The local path does not name an existing directory.
    #[error("local path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The server URL is unusable.
    #[error("invalid server url {url}: {reason}")]
    InvalidServer { url: String, reason: String },
}
