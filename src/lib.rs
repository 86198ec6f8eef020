//! tracksync aligns the Git-tracked files of a directory with the tip of a
//! remote's default branch, replacing only those untracked local files whose
//! paths the remote also tracks.

pub mod commands;
pub mod core;
pub mod error;
pub mod git;
pub mod logging;
pub mod output;
pub mod settings;
pub mod styles;
pub mod utils;

/// Version string shown by `--version`.
pub const VERSION: &str = env!("TRACKSYNC_VERSION");
