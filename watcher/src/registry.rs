//! The live set of watched directories.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Result, WatcherError};
use crate::exclude::ExclusionFilter;
use crate::source::WatchSource;

/// Counters from an initial scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Directories now subscribed.
    pub subscribed: usize,

    /// Excluded directories whose subtrees were pruned.
    pub excluded: usize,

    /// Entries that could not be read or subscribed.
    pub failed: usize,
}

/// Owns the notification source and the set of directories subscribed to it.
pub struct WatchRegistry<W> {
    source: W,
    filter: ExclusionFilter,
    exclude_created: bool,
    watched: BTreeSet<PathBuf>,
}

impl<W: WatchSource> WatchRegistry<W> {
    /// Create an empty registry.
    pub fn new(source: W, filter: ExclusionFilter) -> Self {
        Self {
            source,
            filter,
            exclude_created: true,
            watched: BTreeSet::new(),
        }
    }

    /// Whether newly created directories are checked against the filter
    /// before being subscribed. On by default.
    pub fn with_created_exclusion(mut self, enabled: bool) -> Self {
        self.exclude_created = enabled;
        self
    }

    /// Subscribe every non-excluded directory under `root`, including `root`.
    ///
    /// Excluded directories are pruned: nothing beneath them is enumerated.
    /// Unreadable entries and failed subscriptions are logged and counted,
    /// and the scan carries on.
    pub fn seed(&mut self, root: &Path) -> SeedReport {
        let mut report = SeedReport::default();
        let mut walker = WalkDir::new(root).follow_links(false).into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", WatcherError::Walk(e));
                    report.failed += 1;
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            if self.filter.is_excluded(entry.path()) {
                debug!("Excluded from watch: {}", entry.path().display());
                report.excluded += 1;
                walker.skip_current_dir();
                continue;
            }

            match self.subscribe(entry.path()) {
                Ok(()) => report.subscribed += 1,
                Err(e) => {
                    warn!("{e}");
                    report.failed += 1;
                }
            }
        }

        info!(
            "Watching {} directories under {} (excluded: {}, failed: {})",
            report.subscribed,
            root.display(),
            report.excluded,
            report.failed
        );
        report
    }

    /// Subscribe a directory that just appeared.
    ///
    /// Returns `Ok(false)` when the directory was left out by the filter.
    pub fn on_directory_created(&mut self, path: &Path) -> Result<bool> {
        if self.exclude_created && self.filter.is_excluded(path) {
            debug!("Created directory excluded from watch: {}", path.display());
            return Ok(false);
        }
        self.subscribe(path)?;
        Ok(true)
    }

    /// Drop a path that disappeared, along with every watched directory
    /// beneath it. Returns how many entries left the set; no-op when the
    /// path was never watched.
    pub fn on_path_removed(&mut self, path: &Path) -> usize {
        let gone: Vec<PathBuf> = self
            .watched
            .iter()
            .filter(|watched| watched.starts_with(path))
            .cloned()
            .collect();

        for dir in &gone {
            self.watched.remove(dir);
            if let Err(e) = self.source.unsubscribe(dir) {
                // The backend usually drops watches on deleted directories
                // by itself.
                if matches!(e.kind, notify::ErrorKind::WatchNotFound) {
                    debug!("Watch for {} already gone", dir.display());
                } else {
                    warn!(
                        "{}",
                        WatcherError::Unsubscribe {
                            path: dir.clone(),
                            source: e,
                        }
                    );
                }
            } else {
                debug!("Stopped watching: {}", dir.display());
            }
        }

        gone.len()
    }

    /// Check if a directory is currently watched.
    pub fn contains(&self, path: &Path) -> bool {
        self.watched.contains(path)
    }

    /// Number of watched directories.
    pub fn len(&self) -> usize {
        self.watched.len()
    }

    /// Check if nothing is watched.
    pub fn is_empty(&self) -> bool {
        self.watched.is_empty()
    }

    /// Watched directories in path order.
    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.watched.iter().map(PathBuf::as_path)
    }

    /// The underlying notification source.
    pub fn source(&self) -> &W {
        &self.source
    }

    fn subscribe(&mut self, path: &Path) -> Result<()> {
        if self.watched.contains(path) {
            return Ok(());
        }
        self.source
            .subscribe(path)
            .map_err(|source| WatcherError::Subscribe {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Started watching: {}", path.display());
        self.watched.insert(path.to_path_buf());
        Ok(())
    }
}
