//! The remote store seam.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::error::Result;

/// Streamed content for an upload.
pub type Content = Box<dyn AsyncRead + Send + Sync + Unpin>;

/// Remote file store operations used by the mirror.
///
/// Paths are `/`-separated and relative to the store's root. Failures come
/// back as values; no operation is retried here.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Create or overwrite the object at `path` with the full `content`.
    ///
    /// `mode` is a permission hint for stores that support one.
    async fn write_stream(&self, path: &str, content: Content, mode: u32) -> Result<()>;

    /// Create the collection at `path` and any missing ancestors.
    /// Succeeds if it already exists.
    async fn make_directory_recursive(&self, path: &str, mode: u32) -> Result<()>;

    /// Remove the object or collection at `path`.
    async fn remove(&self, path: &str) -> Result<()>;
}

#[async_trait]
impl<T: RemoteStore + ?Sized> RemoteStore for Arc<T> {
    async fn write_stream(&self, path: &str, content: Content, mode: u32) -> Result<()> {
        (**self).write_stream(path, content, mode).await
    }

    async fn make_directory_recursive(&self, path: &str, mode: u32) -> Result<()> {
        (**self).make_directory_recursive(path, mode).await
    }

    async fn remove(&self, path: &str) -> Result<()> {
        (**self).remove(path).await
    }
}
