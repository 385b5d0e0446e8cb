//! Error types for the directory watcher.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, WatcherError>;

/// Errors that can occur while maintaining the watch set.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Subscribing a directory failed.
    #[error("failed to watch {path}: {source}")]
    Subscribe {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// Unsubscribing a directory failed.
    #[error("failed to unwatch {path}: {source}")]
    Unsubscribe {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// Notify error.
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    /// Directory walk error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
