//! Substring-based directory exclusion.

use std::path::Path;

use tracing::warn;

/// Decides whether a directory is kept out of the watch set.
///
/// Matching is plain substring containment on the full path, not globbing:
/// `.git` excludes `/sync/.git` as well as `/sync/.github` and
/// `/sync/my.git.d`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionFilter {
    patterns: Vec<String>,
}

impl ExclusionFilter {
    /// Build a filter from an ordered list of patterns.
    ///
    /// Empty patterns are dropped, since they would match every path.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = patterns
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| {
                if p.is_empty() {
                    warn!("Ignoring empty exclusion pattern");
                    false
                } else {
                    true
                }
            })
            .collect();
        Self { patterns }
    }

    /// The patterns in configured order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Check if a path contains any exclusion pattern.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.patterns.iter().any(|p| path_str.contains(p.as_str()))
    }
}
