//! Classification of raw changes into remote operations.

use std::fmt;
use std::path::{Path, PathBuf};

use davsync_watcher::{ChangeKinds, RawChange};
use tracing::{debug, info};

use crate::paths::RootPair;

/// Why a change produced no remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The change concerns the local root itself.
    Root,
    /// Editor backup file (name ends in `~`).
    Backup,
    /// Permission-only change.
    Chmod,
    /// No kind that maps to a remote operation.
    NoAction,
}

/// Remote action derived from a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Upload,
    MakeDirectory,
    Delete,
    Ignore(IgnoreReason),
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => f.write_str("upload"),
            Self::MakeDirectory => f.write_str("mkdir"),
            Self::Delete => f.write_str("delete"),
            Self::Ignore(_) => f.write_str("ignore"),
        }
    }
}

/// One remote operation for one local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedOperation {
    pub kind: OperationKind,

    /// Local path the change was reported for.
    pub local_path: PathBuf,

    /// Destination on the remote store.
    pub remote_path: String,

    /// Kinds of the raw change this came from.
    pub trigger: ChangeKinds,
}

impl MappedOperation {
    pub fn is_ignore(&self) -> bool {
        matches!(self.kind, OperationKind::Ignore(_))
    }
}

/// Turns raw changes into mapped operations.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    roots: RootPair,
}

impl EventClassifier {
    pub fn new(roots: RootPair) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &RootPair {
        &self.roots
    }

    /// Classify one raw change.
    ///
    /// Root churn, backup files and permission-only changes are ignored
    /// outright. Otherwise every kind flag present contributes its own
    /// operation, in the order write, create, remove/rename; the result is a
    /// single `Ignore` when none applies. `is_directory` is consulted only
    /// for creates.
    pub fn classify(
        &self,
        change: &RawChange,
        is_directory: impl FnOnce(&Path) -> bool,
    ) -> Vec<MappedOperation> {
        let path = change.path.as_path();
        let kinds = change.kinds;

        if self.roots.is_root(path) {
            info!(
                "root change ignored, event: {}, root: {}",
                path.display(),
                self.roots.local_root()
            );
            return vec![self.operation(OperationKind::Ignore(IgnoreReason::Root), change)];
        }
        if path.to_string_lossy().ends_with('~') {
            debug!("Backup file ignored: {}", path.display());
            return vec![self.operation(OperationKind::Ignore(IgnoreReason::Backup), change)];
        }
        if kinds.is_chmod_only() {
            debug!("Permission change ignored: {}", path.display());
            return vec![self.operation(OperationKind::Ignore(IgnoreReason::Chmod), change)];
        }

        let mut operations = Vec::new();
        if kinds.write {
            operations.push(self.operation(OperationKind::Upload, change));
        }
        if kinds.create {
            let kind = if is_directory(path) {
                OperationKind::MakeDirectory
            } else {
                OperationKind::Upload
            };
            operations.push(self.operation(kind, change));
        }
        if kinds.remove || kinds.rename {
            operations.push(self.operation(OperationKind::Delete, change));
        }

        if operations.is_empty() {
            debug!("No remote action for {kinds} {}", path.display());
            operations.push(self.operation(OperationKind::Ignore(IgnoreReason::NoAction), change));
        }
        operations
    }

    fn operation(&self, kind: OperationKind, change: &RawChange) -> MappedOperation {
        MappedOperation {
            kind,
            local_path: change.path.clone(),
            remote_path: self.roots.map(&change.path),
            trigger: change.kinds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classifier() -> EventClassifier {
        EventClassifier::new(RootPair::new("/sync", "remote/sync"))
    }

    fn kinds_of(ops: &[MappedOperation]) -> Vec<OperationKind> {
        ops.iter().map(|op| op.kind).collect()
    }

    fn never_stat(_: &Path) -> bool {
        panic!("stat must not be called");
    }

    #[test]
    fn test_write_uploads_mapped_path() {
        let ops = classifier().classify(
            &RawChange::new("/sync/notes.txt", ChangeKinds::WRITE),
            never_stat,
        );
        assert_eq!(
            ops,
            vec![MappedOperation {
                kind: OperationKind::Upload,
                local_path: PathBuf::from("/sync/notes.txt"),
                remote_path: "remote/sync/notes.txt".to_string(),
                trigger: ChangeKinds::WRITE,
            }]
        );
    }

    #[test]
    fn test_create_stats_path() {
        let c = classifier();
        let dir = c.classify(&RawChange::new("/sync/docs", ChangeKinds::CREATE), |_| true);
        assert_eq!(kinds_of(&dir), vec![OperationKind::MakeDirectory]);

        let file = c.classify(&RawChange::new("/sync/a.txt", ChangeKinds::CREATE), |_| false);
        assert_eq!(kinds_of(&file), vec![OperationKind::Upload]);
    }

    #[test]
    fn test_remove_and_rename_delete() {
        let c = classifier();
        for kinds in [ChangeKinds::REMOVE, ChangeKinds::RENAME] {
            let ops = c.classify(&RawChange::new("/sync/a.txt", kinds), never_stat);
            assert_eq!(kinds_of(&ops), vec![OperationKind::Delete]);
            assert_eq!(ops[0].remote_path, "remote/sync/a.txt");
        }
    }

    #[test]
    fn test_ignored_changes() {
        let c = classifier();
        let cases = [
            (
                RawChange::new("/sync/", ChangeKinds::WRITE),
                IgnoreReason::Root,
            ),
            (
                RawChange::new("/sync", ChangeKinds::REMOVE),
                IgnoreReason::Root,
            ),
            (
                RawChange::new("/sync/notes.txt~", ChangeKinds::WRITE),
                IgnoreReason::Backup,
            ),
            (
                RawChange::new("/sync/notes.txt", ChangeKinds::CHMOD),
                IgnoreReason::Chmod,
            ),
            (
                RawChange::new("/sync/notes.txt", ChangeKinds::NONE),
                IgnoreReason::NoAction,
            ),
        ];

        for (change, reason) in cases {
            let ops = c.classify(&change, never_stat);
            assert_eq!(kinds_of(&ops), vec![OperationKind::Ignore(reason)]);
            assert!(ops[0].is_ignore());
        }
    }

    #[test]
    fn test_backup_check_precedes_kind_checks() {
        let ops = classifier().classify(
            &RawChange::new("/sync/a~", ChangeKinds::CREATE | ChangeKinds::WRITE),
            never_stat,
        );
        assert_eq!(kinds_of(&ops), vec![OperationKind::Ignore(IgnoreReason::Backup)]);
    }

    #[test]
    fn test_chmod_combined_with_write_still_uploads() {
        let ops = classifier().classify(
            &RawChange::new("/sync/a.txt", ChangeKinds::CHMOD | ChangeKinds::WRITE),
            never_stat,
        );
        assert_eq!(kinds_of(&ops), vec![OperationKind::Upload]);
    }

    #[test]
    fn test_combined_kinds_produce_one_operation_each() {
        let ops = classifier().classify(
            &RawChange::new(
                "/sync/a.txt",
                ChangeKinds::WRITE | ChangeKinds::CREATE | ChangeKinds::REMOVE,
            ),
            |_| false,
        );
        assert_eq!(
            kinds_of(&ops),
            vec![
                OperationKind::Upload,
                OperationKind::Upload,
                OperationKind::Delete
            ]
        );
    }
}
