use super::GitCommand;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use which::which;

/// Check that a runnable `git` is on `PATH`.
pub fn is_git_available() -> bool {
    if which("git").is_err() {
        return false;
    }
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

impl GitCommand {
    /// Whether the work tree carries its own `.git` entry (directory or gitfile).
    pub fn has_git_metadata(&self) -> bool {
        self.work_dir.join(".git").exists()
    }

    pub fn init(&self) -> Result<()> {
        let mut args = vec!["init"];
        if self.quiet {
            args.push("--quiet");
        }
        self.run(&args).context("Git init failed")?;
        Ok(())
    }

    /// Absolute path of the repository's git directory.
    pub fn absolute_git_dir(&self) -> Result<PathBuf> {
        let stdout = self.run(&["rev-parse", "--absolute-git-dir"])?;
        Ok(PathBuf::from(stdout.trim()))
    }
}
