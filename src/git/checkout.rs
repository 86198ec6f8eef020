use super::GitCommand;
use anyhow::{Context, Result};

impl GitCommand {
    /// Create or reset `branch` to `start_point` and check it out, throwing
    /// away local changes to tracked files.
    ///
    /// Runs `git checkout --force -B <branch> <start_point>`. Untracked files
    /// are kept unless the checkout needs their path.
    pub fn checkout_force_branch(&self, branch: &str, start_point: &str) -> Result<()> {
        let mut args = vec!["checkout"];
        if self.quiet {
            args.push("--quiet");
        }
        args.extend(["--force", "-B", branch, start_point]);

        self.run(&args)
            .with_context(|| format!("Failed to check out '{branch}' at '{start_point}'"))?;
        Ok(())
    }

    /// Reset the current branch, index and work tree to `target`.
    ///
    /// Runs `git reset --hard <target>`.
    pub fn reset_hard(&self, target: &str) -> Result<()> {
        let mut args = vec!["reset", "--hard"];
        if self.quiet {
            args.push("--quiet");
        }
        args.push(target);

        self.run(&args)
            .with_context(|| format!("Failed to reset work tree to '{target}'"))?;
        Ok(())
    }
}
