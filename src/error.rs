//! Failures that map to a specific process exit status.
//!
//! Anything not covered here travels as a plain `anyhow::Error` and exits
//! with status 1.

use std::path::PathBuf;
use thiserror::Error;

/// Exit status for a missing `git` binary or a generic failure.
pub const EXIT_FAILURE: i32 = 1;

/// Exit status for a destination that cannot be used as a work tree.
pub const EXIT_UNUSABLE_DESTINATION: i32 = 2;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("'git' is not installed or not found in PATH")]
    GitUnavailable,

    #[error("Destination '{}' exists but is not a directory", path.display())]
    DestinationNotDirectory { path: PathBuf },

    #[error(
        "Remote paths are shadowed by untracked local entries; move them aside and retry:\n{}",
        format_shadowed(paths)
    )]
    ShadowedPaths { paths: Vec<String> },

    #[error("Command failed: {command}\n{output}")]
    GitFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },
}

impl SyncError {
    /// Process exit status for this failure.
    ///
    /// A failing git command propagates its own status; one killed by a
    /// signal has none and maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::GitUnavailable => EXIT_FAILURE,
            SyncError::DestinationNotDirectory { .. } | SyncError::ShadowedPaths { .. } => {
                EXIT_UNUSABLE_DESTINATION
            }
            SyncError::GitFailed { code, .. } => match code {
                Some(code) if *code != 0 => *code,
                _ => EXIT_FAILURE,
            },
        }
    }
}

fn format_shadowed(paths: &[String]) -> String {
    paths
        .iter()
        .map(|p| format!("  {p}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pick the exit status for any error surfaced from a run.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<SyncError>())
        .map(SyncError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}
