use crate::error::SyncError;
use crate::{log_debug, log_warning};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Once, OnceLock};

mod checkout;
mod config;
pub(crate) mod oxide;
mod refs;
mod remote;
mod repo;
mod tree;

pub use repo::is_git_available;

static GITOXIDE_NOTICE: Once = Once::new();

/// Runs git against one work tree.
///
/// Every invocation passes `-C <work_dir>`; the process working directory
/// is never changed.
pub struct GitCommand {
    pub(crate) work_dir: PathBuf,
    pub(crate) quiet: bool,
    pub(crate) use_gitoxide: bool,
    pub(crate) gix_repo: OnceLock<gix::ThreadSafeRepository>,
}

impl GitCommand {
    pub fn new(work_dir: impl Into<PathBuf>, quiet: bool) -> Self {
        Self {
            work_dir: work_dir.into(),
            quiet,
            use_gitoxide: false,
            gix_repo: OnceLock::new(),
        }
    }

    pub fn with_gitoxide(mut self, enabled: bool) -> Self {
        self.use_gitoxide = enabled;
        if enabled {
            GITOXIDE_NOTICE.call_once(|| {
                log_warning!("Using experimental gitoxide backend for read-only git queries");
            });
        }
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Lazily open the work tree's repository via gitoxide.
    /// Returns a thread-local Repository handle.
    pub(crate) fn gix_repo(&self) -> Result<gix::Repository> {
        if let Some(ts) = self.gix_repo.get() {
            return Ok(ts.to_thread_local());
        }
        let ts = gix::ThreadSafeRepository::open(&self.work_dir).with_context(|| {
            format!(
                "Failed to open git repository via gitoxide: {}",
                self.work_dir.display()
            )
        })?;
        // If another thread raced us via set(), that's fine - use whichever won
        let _ = self.gix_repo.set(ts);
        self.gix_repo
            .get()
            .map(|ts| ts.to_thread_local())
            .context("gitoxide repository handle was not initialized")
    }

    fn base_command(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.work_dir);
        cmd
    }

    /// Human-readable form of an invocation, used in logs and error reports.
    pub(crate) fn display_command(&self, args: &[&str]) -> String {
        format!("git -C {} {}", self.work_dir.display(), args.join(" "))
    }

    /// Run git and hand back the raw process output, whatever the exit status.
    pub(crate) fn output(&self, args: &[&str]) -> Result<Output> {
        let display = self.display_command(args);
        log_debug!("$ {display}");
        self.base_command()
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute {display}"))
    }

    /// Run git, failing with [`SyncError::GitFailed`] on a non-zero exit.
    ///
    /// Returns stdout. The error carries stdout and stderr combined.
    pub(crate) fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            return Err(SyncError::GitFailed {
                command: self.display_command(args),
                code: output.status.code(),
                output: combined_output(&output),
            }
            .into());
        }

        let trimmed = stdout.trim_end();
        if !trimmed.is_empty() {
            log_debug!("{trimmed}");
        }
        Ok(stdout)
    }

    /// Run git for its exit status only; stderr is discarded.
    pub(crate) fn succeeds(&self, args: &[&str]) -> Result<Option<String>> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Ok(None);
        }
        let stdout = String::from_utf8(output.stdout)
            .with_context(|| format!("Failed to parse {} output", args.join(" ")))?;
        Ok(Some(stdout.trim().to_string()))
    }
}

fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut combined = String::new();
    for part in [stdout.trim_end(), stderr.trim_end()] {
        if part.is_empty() {
            continue;
        }
        if !combined.is_empty() {
            combined.push('\n');
        }
        combined.push_str(part);
    }
    combined
}

/// Split NUL-terminated git output (`-z`) into paths.
///
/// Paths that are not valid UTF-8 are rejected rather than mangled, since
/// they are later used to address files on disk.
pub(crate) fn split_nul_paths(raw: &[u8]) -> Result<Vec<String>> {
    raw.split(|b| *b == 0)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            String::from_utf8(entry.to_vec()).with_context(|| {
                format!(
                    "Path is not valid UTF-8: {}",
                    String::from_utf8_lossy(entry)
                )
            })
        })
        .collect()
}
