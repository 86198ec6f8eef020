//! Set arithmetic between the remote tree and local untracked entries.
//!
//! Everything here is pure; listing the sets is the git layer's job.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Untracked local paths that the remote tree also tracks.
///
/// Only members of this set are ever removed from the work tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConflictSet {
    paths: BTreeSet<String>,
}

impl ConflictSet {
    pub fn between(tracked: &BTreeSet<String>, untracked: &BTreeSet<String>) -> Self {
        Self {
            paths: tracked.intersection(untracked).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.paths.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowKind {
    /// An untracked file sits where the remote needs a directory.
    FileBlocksDirectory,
    /// An untracked directory sits where the remote needs a file.
    DirectoryBlocksFile,
}

/// A remote path that cannot be materialized because an untracked entry
/// occupies one of its ancestors, or the path itself as a directory.
///
/// Plain intersection misses these, so they are reported instead of being
/// left to whatever `git checkout` does with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowedPath {
    pub remote_path: String,
    pub local_path: String,
    pub kind: ShadowKind,
}

impl fmt::Display for ShadowedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ShadowKind::FileBlocksDirectory => write!(
                f,
                "{} (untracked file '{}' is in the way)",
                self.remote_path, self.local_path
            ),
            ShadowKind::DirectoryBlocksFile => write!(
                f,
                "{} (untracked directory '{}' is in the way)",
                self.remote_path, self.local_path
            ),
        }
    }
}

/// Find remote paths blocked by untracked entries of the other kind.
pub fn find_shadowed(
    tracked: &BTreeSet<String>,
    untracked: &BTreeSet<String>,
) -> Vec<ShadowedPath> {
    let mut shadowed = Vec::new();

    for remote_path in tracked {
        for (idx, _) in remote_path.match_indices('/') {
            let ancestor = &remote_path[..idx];
            if untracked.contains(ancestor) {
                shadowed.push(ShadowedPath {
                    remote_path: remote_path.clone(),
                    local_path: ancestor.to_string(),
                    kind: ShadowKind::FileBlocksDirectory,
                });
                break;
            }
        }

        let dir_prefix = format!("{remote_path}/");
        let blocks = untracked
            .range(dir_prefix.clone()..)
            .next()
            .is_some_and(|p| p.starts_with(&dir_prefix));
        if blocks {
            shadowed.push(ShadowedPath {
                remote_path: remote_path.clone(),
                local_path: remote_path.clone(),
                kind: ShadowKind::DirectoryBlocksFile,
            });
        }
    }

    shadowed
}
