use super::GitCommand;
use crate::log_debug;
use anyhow::{Context, Result};

impl GitCommand {
    /// Read a config value through git's layered lookup (local, global, system).
    ///
    /// Local config is only read from the work tree's own repository. When
    /// the work tree has no `.git` yet, discovery is stopped at its parent so
    /// an enclosing repository's config does not leak in.
    pub fn config_get(&self, key: &str) -> Result<Option<String>> {
        let args = ["config", "--get", key];
        let display = self.display_command(&args);
        log_debug!("$ {display}");

        let mut cmd = self.base_command();
        if !self.has_git_metadata() {
            if let Some(parent) = self.work_dir.parent() {
                cmd.env("GIT_CEILING_DIRECTORIES", parent);
            }
        }
        let output = cmd
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute {display}"))?;

        if output.status.success() {
            let value = String::from_utf8(output.stdout)
                .context("Failed to parse git config output")?
                .trim()
                .to_string();
            Ok(Some(value))
        } else {
            // Exit code 1 means the key was not found, which is not an error
            Ok(None)
        }
    }
}
