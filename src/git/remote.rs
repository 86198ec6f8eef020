use super::oxide;
use super::GitCommand;
use anyhow::{Context, Result};

impl GitCommand {
    /// List all configured remotes.
    pub fn remote_list(&self) -> Result<Vec<String>> {
        if self.use_gitoxide {
            return oxide::remote_list(&self.gix_repo()?);
        }
        let stdout = self.run(&["remote"])?;

        Ok(stdout
            .lines()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }

    pub fn remote_exists(&self, remote: &str) -> Result<bool> {
        let remotes = self.remote_list()?;
        Ok(remotes.iter().any(|r| r == remote))
    }

    pub fn remote_add(&self, remote: &str, url: &str) -> Result<()> {
        self.run(&["remote", "add", remote, url])
            .with_context(|| format!("Failed to add remote '{remote}'"))?;
        Ok(())
    }

    pub fn remote_set_url(&self, remote: &str, url: &str) -> Result<()> {
        self.run(&["remote", "set-url", remote, url])
            .with_context(|| format!("Failed to update URL of remote '{remote}'"))?;
        Ok(())
    }

    /// Get the URL of a remote.
    pub fn remote_get_url(&self, remote: &str) -> Result<String> {
        let stdout = self.run(&["remote", "get-url", remote])?;
        Ok(stdout.trim().to_string())
    }

    pub fn fetch(&self, remote: &str) -> Result<()> {
        let mut args = vec!["fetch", remote];
        if self.quiet {
            args.push("--quiet");
        }
        self.run(&args)
            .with_context(|| format!("Failed to fetch '{remote}'"))?;
        Ok(())
    }

    /// Point `refs/remotes/<remote>/HEAD` at the branch the remote advertises.
    pub fn remote_set_head_auto(&self, remote: &str) -> Result<()> {
        self.run(&["remote", "set-head", remote, "--auto"])?;
        Ok(())
    }
}
