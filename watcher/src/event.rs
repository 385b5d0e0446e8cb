//! Raw change notifications from directory watching.

use std::fmt;
use std::ops::BitOr;
use std::path::PathBuf;

use notify::event::{EventKind, ModifyKind, RenameMode};

/// Set of operation kinds carried by one raw notification.
///
/// The kinds are independent flags rather than a single tag: a backend may
/// report several at once for the same path, and each one is acted on.
/// No flag set at all is the "other" kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChangeKinds {
    pub write: bool,
    pub create: bool,
    pub remove: bool,
    pub rename: bool,
    pub chmod: bool,
}

impl ChangeKinds {
    /// No kind set.
    pub const NONE: Self = Self {
        write: false,
        create: false,
        remove: false,
        rename: false,
        chmod: false,
    };

    pub const WRITE: Self = Self {
        write: true,
        ..Self::NONE
    };

    pub const CREATE: Self = Self {
        create: true,
        ..Self::NONE
    };

    pub const REMOVE: Self = Self {
        remove: true,
        ..Self::NONE
    };

    pub const RENAME: Self = Self {
        rename: true,
        ..Self::NONE
    };

    pub const CHMOD: Self = Self {
        chmod: true,
        ..Self::NONE
    };

    /// True when no kind is set.
    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }

    /// True when the permission flag is the only one set.
    pub fn is_chmod_only(self) -> bool {
        self == Self::CHMOD
    }
}

impl BitOr for ChangeKinds {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            write: self.write || rhs.write,
            create: self.create || rhs.create,
            remove: self.remove || rhs.remove,
            rename: self.rename || rhs.rename,
            chmod: self.chmod || rhs.chmod,
        }
    }
}

impl fmt::Display for ChangeKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (self.create, "CREATE"),
            (self.write, "WRITE"),
            (self.remove, "REMOVE"),
            (self.rename, "RENAME"),
            (self.chmod, "CHMOD"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| *name)
            .collect();
        if set.is_empty() {
            f.write_str("OTHER")
        } else {
            f.write_str(&set.join("|"))
        }
    }
}

/// One raw change notification for a single local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChange {
    /// Absolute local path of the affected entry.
    pub path: PathBuf,

    /// Kinds reported for the path.
    pub kinds: ChangeKinds,
}

impl RawChange {
    /// Create a new raw change.
    pub fn new(path: impl Into<PathBuf>, kinds: ChangeKinds) -> Self {
        Self {
            path: path.into(),
            kinds,
        }
    }

    /// Split a `notify` event into one raw change per affected path.
    ///
    /// Renames come out as a rename of the old path and a create of the new
    /// one, so the new name is mirrored like any other created entry. The
    /// combined `Both` event yields nothing.
    pub fn from_notify(event: notify::Event) -> Vec<Self> {
        let notify::Event { kind, paths, .. } = event;

        match kind {
            EventKind::Create(_) => Self::all(paths, ChangeKinds::CREATE),
            EventKind::Remove(_) => Self::all(paths, ChangeKinds::REMOVE),
            EventKind::Modify(ModifyKind::Metadata(_)) => Self::all(paths, ChangeKinds::CHMOD),
            EventKind::Modify(ModifyKind::Name(mode)) => match mode {
                RenameMode::From => Self::all(paths, ChangeKinds::RENAME),
                RenameMode::To => Self::all(paths, ChangeKinds::CREATE),
                // Backends that pair the two sides also send them
                // separately as `From` and `To`.
                RenameMode::Both => Vec::new(),
                // Backends that cannot tell the two sides apart: the side
                // that still exists is the new name.
                RenameMode::Any | RenameMode::Other => paths
                    .into_iter()
                    .map(|path| {
                        let kinds = if path.exists() {
                            ChangeKinds::CREATE
                        } else {
                            ChangeKinds::RENAME
                        };
                        Self::new(path, kinds)
                    })
                    .collect(),
            },
            EventKind::Modify(_) => Self::all(paths, ChangeKinds::WRITE),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => {
                Self::all(paths, ChangeKinds::NONE)
            }
        }
    }

    fn all(paths: Vec<PathBuf>, kinds: ChangeKinds) -> Vec<Self> {
        paths.into_iter().map(|path| Self::new(path, kinds)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn event(kind: EventKind, paths: &[&str]) -> notify::Event {
        paths
            .iter()
            .fold(notify::Event::new(kind), |e, p| e.add_path(PathBuf::from(p)))
    }

    #[test]
    fn test_create_and_remove_map_to_flags() {
        let created = RawChange::from_notify(event(
            EventKind::Create(CreateKind::File),
            &["/sync/a.txt"],
        ));
        assert_eq!(created, vec![RawChange::new("/sync/a.txt", ChangeKinds::CREATE)]);

        let removed = RawChange::from_notify(event(
            EventKind::Remove(RemoveKind::Any),
            &["/sync/a.txt"],
        ));
        assert_eq!(removed, vec![RawChange::new("/sync/a.txt", ChangeKinds::REMOVE)]);
    }

    #[test]
    fn test_modify_data_is_write_and_metadata_is_chmod() {
        let write = RawChange::from_notify(event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            &["/sync/a.txt"],
        ));
        assert_eq!(write[0].kinds, ChangeKinds::WRITE);

        let chmod = RawChange::from_notify(event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
            &["/sync/a.txt"],
        ));
        assert!(chmod[0].kinds.is_chmod_only());
    }

    #[test]
    fn test_rename_sides_map_once() {
        let from = RawChange::from_notify(event(
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            &["/sync/old.txt"],
        ));
        let to = RawChange::from_notify(event(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            &["/sync/new.txt"],
        ));
        let both = RawChange::from_notify(event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/sync/old.txt", "/sync/new.txt"],
        ));

        assert_eq!(from, vec![RawChange::new("/sync/old.txt", ChangeKinds::RENAME)]);
        assert_eq!(to, vec![RawChange::new("/sync/new.txt", ChangeKinds::CREATE)]);
        assert!(both.is_empty());
    }

    #[test]
    fn test_ambiguous_rename_uses_existence() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("present.txt");
        std::fs::write(&present, b"x").unwrap();
        let gone = temp_dir.path().join("gone.txt");

        let changes = RawChange::from_notify(
            notify::Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Any)))
                .add_path(gone.clone())
                .add_path(present.clone()),
        );
        assert_eq!(
            changes,
            vec![
                RawChange::new(gone, ChangeKinds::RENAME),
                RawChange::new(present, ChangeKinds::CREATE),
            ]
        );
    }

    #[test]
    fn test_access_has_no_kind() {
        let changes = RawChange::from_notify(event(
            EventKind::Access(AccessKind::Read),
            &["/sync/a.txt"],
        ));
        assert!(changes[0].kinds.is_empty());
        assert_eq!(changes[0].kinds.to_string(), "OTHER");
    }

    #[test]
    fn test_combined_kinds_display() {
        let kinds = ChangeKinds::CREATE | ChangeKinds::WRITE;
        assert!(kinds.create && kinds.write);
        assert!(!kinds.is_chmod_only());
        assert_eq!(kinds.to_string(), "CREATE|WRITE");
    }
}
