//! The single consumer loop tying the pipeline together.

use std::path::Path;

use davsync_dav_client::RemoteStore;
use davsync_watcher::{RawChange, SeedReport, SourceEvent, WatchRegistry, WatchSource};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::classify::{EventClassifier, OperationKind};
use crate::dispatch::{Dispatcher, Outcome};
use crate::notification::NotificationSink;
use crate::paths::RootPair;

/// Mirrors local changes onto the remote store, one change at a time.
///
/// The mirror owns the watch set outright; only the loop below mutates it.
pub struct Mirror<W, S, N> {
    classifier: EventClassifier,
    registry: WatchRegistry<W>,
    dispatcher: Dispatcher<S, N>,
}

impl<W, S, N> Mirror<W, S, N>
where
    W: WatchSource,
    S: RemoteStore,
    N: NotificationSink,
{
    pub fn new(roots: RootPair, registry: WatchRegistry<W>, dispatcher: Dispatcher<S, N>) -> Self {
        Self {
            classifier: EventClassifier::new(roots),
            registry,
            dispatcher,
        }
    }

    pub fn registry(&self) -> &WatchRegistry<W> {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher<S, N> {
        &self.dispatcher
    }

    /// Subscribe the local tree for notifications.
    pub fn seed(&mut self) -> SeedReport {
        let root = self.classifier.roots().local_root().to_string();
        self.registry.seed(Path::new(&root))
    }

    /// Classify, map and dispatch one change, keeping the watch set in step.
    ///
    /// Returns one outcome per derived operation. Nothing here fails the
    /// caller: errors end up in the outcomes and the log.
    pub async fn process(&mut self, change: RawChange) -> Vec<Outcome> {
        let operations = self.classifier.classify(&change, Path::is_dir);
        let mut outcomes = Vec::with_capacity(operations.len());

        for operation in operations {
            if operation.kind == OperationKind::MakeDirectory {
                // Subscribe first so entries created right after the
                // directory are not missed while the remote call runs.
                if let Err(e) = self.registry.on_directory_created(&operation.local_path) {
                    warn!("{e}");
                }
            }

            let outcome = self.dispatcher.dispatch(&operation).await;

            if operation.kind == OperationKind::Delete {
                self.registry.on_path_removed(&operation.local_path);
            }
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Consume notifications in arrival order until the source closes.
    ///
    /// Errors from the notification source are logged and waiting resumes.
    pub async fn run(mut self, mut events: mpsc::Receiver<SourceEvent>) {
        info!(
            "Mirroring {} to {}",
            self.classifier.roots().local_root(),
            self.classifier.roots().remote_root()
        );

        while let Some(event) = events.recv().await {
            match event {
                Ok(event) => {
                    for change in RawChange::from_notify(event) {
                        self.process(change).await;
                    }
                }
                Err(e) => warn!("Watcher error: {e}"),
            }
        }

        info!("Notification source closed, stopping");
    }
}
