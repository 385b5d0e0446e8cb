//! Error types for the WebDAV client.

use thiserror::Error;

/// Result type alias for remote store operations.
pub type Result<T> = std::result::Result<T, DavError>;

/// Errors returned by remote store operations.
#[derive(Error, Debug)]
pub enum DavError {
    /// The server URL could not be parsed.
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The server URL cannot carry a path.
    #[error("unsupported server url: {0}")]
    UnsupportedUrl(String),

    /// The server answered with an unexpected status.
    #[error("{method} {path} failed with status {status}")]
    Status {
        method: String,
        path: String,
        status: reqwest::StatusCode,
    },

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid extension method.
    #[error("invalid method: {0}")]
    Method(#[from] http::method::InvalidMethod),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
