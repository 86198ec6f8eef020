use crate::error::SyncError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn get_current_directory() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to get current directory")
}

pub fn create_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    Ok(())
}

/// Create the destination if needed and return its canonical path.
///
/// A destination that exists but is not a directory cannot hold a work tree.
pub fn prepare_destination(path: &Path) -> Result<PathBuf> {
    if path.exists() && !path.is_dir() {
        return Err(SyncError::DestinationNotDirectory {
            path: path.to_path_buf(),
        }
        .into());
    }
    if !path.exists() {
        create_directory(path)?;
    }
    path.canonicalize()
        .with_context(|| format!("Failed to resolve destination: {}", path.display()))
}

/// Remove a file, symlink or directory tree.
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .with_context(|| format!("Failed to inspect {}", path.display()))?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
    } else {
        fs::remove_file(path)
            .with_context(|| format!("Failed to remove file: {}", path.display()))?;
    }
    Ok(())
}

/// Move a file, symlink or directory tree from `from` to `to`.
///
/// Tries `rename` first. Falls back to copy then remove when that fails, e.g.
/// when the target is on another filesystem (a `.git` gitfile pointing to a
/// different mount).
pub fn move_path(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    if let Err(e) = copy_tree(from, to) {
        if fs::symlink_metadata(to).is_ok() {
            remove_path(to).ok();
        }
        return Err(e);
    }
    remove_path(from)
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(from)
        .with_context(|| format!("Failed to inspect {}", from.display()))?;

    if metadata.file_type().is_symlink() {
        let target = fs::read_link(from)
            .with_context(|| format!("Failed to read link {}", from.display()))?;
        copy_symlink(&target, to)?;
    } else if metadata.is_dir() {
        fs::create_dir(to)
            .with_context(|| format!("Failed to create directory: {}", to.display()))?;
        for entry in fs::read_dir(from)
            .with_context(|| format!("Failed to read directory: {}", from.display()))?
        {
            let entry = entry
                .with_context(|| format!("Failed to read directory: {}", from.display()))?;
            copy_tree(&entry.path(), &to.join(entry.file_name()))?;
        }
    } else {
        fs::copy(from, to).with_context(|| {
            format!("Failed to copy {} to {}", from.display(), to.display())
        })?;
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(target: &Path, to: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, to)
        .with_context(|| format!("Failed to create symlink: {}", to.display()))
}

#[cfg(not(unix))]
fn copy_symlink(target: &Path, to: &Path) -> Result<()> {
    anyhow::bail!(
        "Cannot move symlink {} -> {} across filesystems",
        to.display(),
        target.display()
    )
}

/// Reject branch names that git would misread as options or that escape
/// the ref namespace.
pub fn validate_branch_name(branch_name: &str) -> Result<()> {
    if branch_name.is_empty() {
        anyhow::bail!("Branch name cannot be empty");
    }

    if branch_name.starts_with('-') {
        anyhow::bail!("Branch name cannot start with '-'");
    }

    if branch_name.contains("..") {
        anyhow::bail!("Branch name cannot contain '..'");
    }

    if branch_name.starts_with('/') || branch_name.ends_with('/') {
        anyhow::bail!("Branch name cannot start or end with '/'");
    }

    if branch_name
        .chars()
        .any(|c| c.is_control() || c.is_whitespace())
    {
        anyhow::bail!("Branch name contains whitespace or control characters");
    }

    if branch_name == "HEAD" {
        anyhow::bail!("Branch name cannot be 'HEAD'");
    }

    Ok(())
}

pub fn validate_remote_name(remote: &str) -> Result<()> {
    if remote.is_empty() {
        anyhow::bail!("Remote name cannot be empty");
    }

    if remote.starts_with('-') {
        anyhow::bail!("Remote name cannot start with '-'");
    }

    if remote.contains('/') || remote.chars().any(|c| c.is_control() || c.is_whitespace()) {
        anyhow::bail!("Remote name contains unsafe characters: '{remote}'");
    }

    Ok(())
}

pub fn validate_remote_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        anyhow::bail!("Remote URL cannot be empty");
    }

    // git would parse it as an option
    if url.starts_with('-') {
        anyhow::bail!("Remote URL cannot start with '-'");
    }

    if url.chars().any(|c| c.is_control()) {
        anyhow::bail!("Remote URL contains control characters");
    }

    Ok(())
}
