//! Git config-based settings for tracksync.
//!
//! Settings are loaded from git's layered config system (local → global →
//! system) with built-in defaults as fallback. Local config only applies
//! when the destination is itself a repository; the config of a repository
//! enclosing the destination is never read.
//!
//! # Config Keys
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `tracksync.url` | site repository URL | Remote URL when none is given on the command line |
//! | `tracksync.remote` | `"origin"` | Name of the remote to align with |
//! | `tracksync.fallbackBranch` | `"main"` | Branch used when the remote default branch cannot be resolved |
//! | `tracksync.experimental.gitoxide` | `false` | Serve read-only queries through gitoxide |
//!
//! # Example
//!
//! ```bash
//! # Point every sync at a staging mirror
//! git config --global tracksync.url https://git.example.com/site-staging.git
//!
//! # This site still publishes from master
//! git config tracksync.fallbackBranch master
//! ```

use crate::git::GitCommand;
use anyhow::Result;

/// Default values for settings.
pub mod defaults {
    /// Repository the publishing workflow was built around.
    pub const URL: &str = "https://github.com/ninocaussefeuillet/bertrand_causse_site.git";

    pub const REMOTE: &str = "origin";

    pub const FALLBACK_BRANCH: &str = "main";

    pub const USE_GITOXIDE: bool = false;
}

/// Git config keys for tracksync settings.
pub mod keys {
    pub const URL: &str = "tracksync.url";

    pub const REMOTE: &str = "tracksync.remote";

    pub const FALLBACK_BRANCH: &str = "tracksync.fallbackBranch";

    pub const USE_GITOXIDE: &str = "tracksync.experimental.gitoxide";
}

/// User-configurable settings for a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Remote URL used when the command line does not name one.
    pub url: String,

    /// Remote name the destination is aligned with.
    pub remote: String,

    /// Branch used when the remote's default branch cannot be resolved.
    pub fallback_branch: String,

    /// Use gitoxide for read-only queries.
    pub use_gitoxide: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            url: defaults::URL.to_string(),
            remote: defaults::REMOTE.to_string(),
            fallback_branch: defaults::FALLBACK_BRANCH.to_string(),
            use_gitoxide: defaults::USE_GITOXIDE,
        }
    }
}

impl SyncSettings {
    /// Load settings as seen from `git`'s work directory.
    pub fn load(git: &GitCommand) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(value) = git.config_get(keys::URL)? {
            if !value.is_empty() {
                settings.url = value;
            }
        }

        if let Some(value) = git.config_get(keys::REMOTE)? {
            if !value.is_empty() {
                settings.remote = value;
            }
        }

        if let Some(value) = git.config_get(keys::FALLBACK_BRANCH)? {
            if !value.is_empty() {
                settings.fallback_branch = value;
            }
        }

        if let Some(value) = git.config_get(keys::USE_GITOXIDE)? {
            settings.use_gitoxide = parse_bool(&value, defaults::USE_GITOXIDE);
        }

        Ok(settings)
    }
}

/// Parse a git config boolean the way git does; unknown values keep `default`.
fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => true,
        "false" | "no" | "off" | "0" => false,
        _ => default,
    }
}
