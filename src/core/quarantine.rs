//! Staged removal of conflicting untracked entries.
//!
//! Entries are moved under `<git-dir>/tracksync/quarantine/<stamp>/` rather
//! than deleted, so they can be put back if the work tree cannot be aligned
//! afterwards. The quarantine is discarded once alignment succeeds.

use crate::utils::{move_path, remove_path};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const QUARANTINE_DIR: &str = "tracksync/quarantine";

#[derive(Debug)]
pub struct Quarantine {
    root: PathBuf,
    work_tree: PathBuf,
    moved: Vec<String>,
}

impl Quarantine {
    /// Reserve a fresh quarantine directory. Nothing is created on disk
    /// until the first entry is stashed.
    pub fn new(git_dir: &Path, work_tree: &Path) -> Self {
        let base = git_dir.join(QUARANTINE_DIR);
        let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S%3f").to_string();
        let mut root = base.join(&stamp);
        let mut attempt = 1;
        while root.exists() {
            root = base.join(format!("{stamp}-{attempt}"));
            attempt += 1;
        }
        Self {
            root,
            work_tree: work_tree.to_path_buf(),
            moved: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.moved.is_empty()
    }

    /// Paths stashed so far, relative to the work tree.
    pub fn entries(&self) -> &[String] {
        &self.moved
    }

    /// Move `relative` out of the work tree into the quarantine.
    pub fn stash(&mut self, relative: &str) -> Result<()> {
        let source = self.work_tree.join(relative);
        let target = self.root.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        move_path(&source, &target).with_context(|| {
            format!(
                "Failed to move '{}' into quarantine at {}",
                relative,
                target.display()
            )
        })?;
        self.moved.push(relative.to_string());
        Ok(())
    }

    /// Put every stashed entry back at its original path, replacing
    /// whatever now occupies it. Returns the restored paths.
    pub fn restore(self) -> Result<Vec<String>> {
        for relative in self.moved.iter().rev() {
            let original = self.work_tree.join(relative);
            let stashed = self.root.join(relative);
            if fs::symlink_metadata(&original).is_ok() {
                remove_path(&original)?;
            }
            if let Some(parent) = original.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
            move_path(&stashed, &original)
                .with_context(|| format!("Failed to restore '{relative}' from quarantine"))?;
        }
        if self.root.exists() {
            fs::remove_dir_all(&self.root).ok();
        }
        Ok(self.moved)
    }

    /// Delete the stashed entries for good.
    pub fn discard(self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root).with_context(|| {
                format!("Failed to remove quarantine: {}", self.root.display())
            })?;
        }
        Ok(())
    }

    /// Leave the stashed entries on disk and return where they are.
    pub fn keep(self) -> Option<PathBuf> {
        if self.moved.is_empty() {
            None
        } else {
            Some(self.root)
        }
    }
}
