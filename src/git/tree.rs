use super::{oxide, split_nul_paths, GitCommand};
use crate::error::SyncError;
use anyhow::Result;
use std::collections::BTreeSet;

impl GitCommand {
    /// Every blob path in the tree of `rev`, relative to the repository root.
    pub fn ls_tree_paths(&self, rev: &str) -> Result<BTreeSet<String>> {
        if self.use_gitoxide {
            return oxide::ls_tree_paths(&self.gix_repo()?, rev);
        }
        self.nul_paths(&["ls-tree", "-r", "-z", "--name-only", "--full-tree", rev])
    }

    /// Untracked, non-ignored paths in the work tree.
    ///
    /// Files inside untracked directories are listed individually.
    pub fn ls_untracked(&self) -> Result<BTreeSet<String>> {
        self.nul_paths(&[
            "ls-files",
            "--others",
            "--exclude-standard",
            "-z",
            "--full-name",
        ])
    }

    fn nul_paths(&self, args: &[&str]) -> Result<BTreeSet<String>> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(SyncError::GitFailed {
                command: self.display_command(args),
                code: output.status.code(),
                output: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            }
            .into());
        }
        Ok(split_nul_paths(&output.stdout)?.into_iter().collect())
    }
}
