//! Execution of mapped operations against the remote store.

use std::path::PathBuf;

use davsync_dav_client::{DavError, RemoteStore};
use thiserror::Error;
use tracing::{error, info};

use crate::classify::{MappedOperation, OperationKind};
use crate::notification::NotificationSink;

/// Permission hint for uploaded files.
pub const FILE_MODE: u32 = 0o644;

/// Permission hint for created directories.
pub const DIRECTORY_MODE: u32 = 0o755;

/// Title of the notification raised for a failed operation.
const FAILURE_TITLE: &str = "WebDAV error";

/// A remote operation that did not go through.
#[derive(Error, Debug)]
#[error("{kind} {remote_path} failed: {source}")]
pub struct DispatchFailure {
    pub kind: OperationKind,
    pub local_path: PathBuf,
    pub remote_path: String,
    #[source]
    pub source: DavError,
}

/// Result of dispatching one operation.
#[derive(Debug)]
pub enum Outcome {
    /// The remote call succeeded.
    Completed,
    /// Nothing to do.
    Skipped,
    /// The remote call failed; it is not retried.
    Failed(DispatchFailure),
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Runs operations one at a time and reports each outcome.
pub struct Dispatcher<S, N> {
    store: S,
    sink: N,
}

impl<S: RemoteStore, N: NotificationSink> Dispatcher<S, N> {
    pub fn new(store: S, sink: N) -> Self {
        Self { store, sink }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    /// Execute `operation` and report the outcome to the log and the sink.
    /// Ignored operations make no call and report nothing.
    pub async fn dispatch(&self, operation: &MappedOperation) -> Outcome {
        let result = match operation.kind {
            OperationKind::Ignore(_) => return Outcome::Skipped,
            OperationKind::Upload => self.upload(operation).await,
            OperationKind::MakeDirectory => {
                self.store
                    .make_directory_recursive(&operation.remote_path, DIRECTORY_MODE)
                    .await
            }
            OperationKind::Delete => self.store.remove(&operation.remote_path).await,
        };

        match result {
            Ok(()) => {
                let title = success_title(operation.kind);
                info!(
                    "{} {} {}",
                    operation.trigger,
                    operation.remote_path,
                    title.to_lowercase()
                );
                self.sink.notify(title, &operation.remote_path, false);
                Outcome::Completed
            }
            Err(source) => {
                error!(
                    "{} {} webdav error: {source}",
                    operation.trigger, operation.remote_path
                );
                self.sink.notify(FAILURE_TITLE, &source.to_string(), true);
                Outcome::Failed(DispatchFailure {
                    kind: operation.kind,
                    local_path: operation.local_path.clone(),
                    remote_path: operation.remote_path.clone(),
                    source,
                })
            }
        }
    }

    /// The file handle is owned by the upload body and closed when the call
    /// returns, whatever the result.
    async fn upload(&self, operation: &MappedOperation) -> davsync_dav_client::Result<()> {
        let file = tokio::fs::File::open(&operation.local_path).await?;
        self.store
            .write_stream(&operation.remote_path, Box::new(file), FILE_MODE)
            .await
    }
}

fn success_title(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Delete => "Remove success",
        OperationKind::MakeDirectory => "Directory created",
        _ => "Upload success",
    }
}
