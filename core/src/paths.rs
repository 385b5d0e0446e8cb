//! Local to remote path mapping.

use std::path::{MAIN_SEPARATOR, Path};

/// The local root being mirrored and the remote prefix it maps onto.
///
/// Both are stored `/`-separated with exactly one trailing `/`; local
/// paths are brought to the same form before they are compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPair {
    local_root: String,
    remote_root: String,
}

impl RootPair {
    pub fn new(local_root: impl AsRef<Path>, remote_root: &str) -> Self {
        let local = local_string(local_root.as_ref());
        Self {
            local_root: with_trailing_slash(&local),
            remote_root: with_trailing_slash(remote_root),
        }
    }

    pub fn local_root(&self) -> &str {
        &self.local_root
    }

    pub fn remote_root(&self) -> &str {
        &self.remote_root
    }

    /// True when `path` denotes the local root itself.
    pub fn is_root(&self, path: &Path) -> bool {
        with_trailing_slash(&local_string(path)) == self.local_root
    }

    /// Map a local path under the local root to its remote path.
    ///
    /// Doubled separators from the join are collapsed. A path outside the
    /// local root is appended whole.
    pub fn map(&self, local_path: &Path) -> String {
        let local = local_string(local_path);
        let relative = local
            .strip_prefix(self.local_root.as_str())
            .unwrap_or(&local);

        collapse_separators(&format!("{}{relative}", self.remote_root))
    }
}

fn local_string(path: &Path) -> String {
    with_forward_slashes(&path.to_string_lossy(), MAIN_SEPARATOR)
}

/// Replace the platform separator with `/`. A no-op where it already is
/// `/`, so backslashes in Unix file names survive.
fn with_forward_slashes(path: &str, separator: char) -> String {
    if separator == '/' {
        path.to_string()
    } else {
        path.replace(separator, "/")
    }
}

fn with_trailing_slash(path: &str) -> String {
    format!("{}/", path.trim_end_matches('/'))
}

fn collapse_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' && previous_slash {
            continue;
        }
        previous_slash = c == '/';
        out.push(c);
    }
    out
}
