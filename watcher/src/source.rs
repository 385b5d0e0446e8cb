//! Notification sources the registry subscribes directories to.

use std::path::Path;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::error;

use crate::error::Result;

/// Capacity of the channel between the backend thread and the consumer.
pub const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Items delivered by a channel-backed source.
pub type SourceEvent = notify::Result<notify::Event>;

/// A notification source that directories can be subscribed to.
///
/// Subscriptions are per directory and non-recursive; the registry takes
/// care of reaching nested directories itself.
pub trait WatchSource {
    /// Start receiving notifications for entries directly inside `path`.
    fn subscribe(&mut self, path: &Path) -> notify::Result<()>;

    /// Stop receiving notifications for `path`.
    fn unsubscribe(&mut self, path: &Path) -> notify::Result<()>;
}

impl WatchSource for RecommendedWatcher {
    fn subscribe(&mut self, path: &Path) -> notify::Result<()> {
        self.watch(path, RecursiveMode::NonRecursive)
    }

    fn unsubscribe(&mut self, path: &Path) -> notify::Result<()> {
        self.unwatch(path)
    }
}

/// Create the platform watcher together with the ordered stream of its
/// events and errors.
///
/// The backend thread blocks when the channel is full, so a slow consumer
/// holds events back at the source instead of dropping them.
pub fn channel_watcher() -> Result<(RecommendedWatcher, mpsc::Receiver<SourceEvent>)> {
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let watcher = notify::recommended_watcher(move |res: SourceEvent| {
        if let Err(e) = event_tx.blocking_send(res) {
            error!("Failed to send file event: {e}");
        }
    })?;

    Ok((watcher, event_rx))
}
