use super::oxide;
use super::GitCommand;
use anyhow::Result;

impl GitCommand {
    /// `git symbolic-ref --quiet --short <ref>`; `None` when the ref is
    /// missing or not symbolic.
    pub fn symbolic_ref_short(&self, ref_name: &str) -> Result<Option<String>> {
        if self.use_gitoxide {
            return Ok(oxide::symbolic_ref_short(&self.gix_repo()?, ref_name).ok());
        }
        let value = self.succeeds(&["symbolic-ref", "--quiet", "--short", ref_name])?;
        Ok(value.filter(|v| !v.is_empty()))
    }

    /// `git rev-parse --abbrev-ref <rev>`; `None` when the revision does not
    /// resolve.
    pub fn rev_parse_abbrev_ref(&self, rev: &str) -> Result<Option<String>> {
        let value = self.succeeds(&["rev-parse", "--abbrev-ref", rev])?;
        Ok(value.filter(|v| !v.is_empty()))
    }

    /// Resolve a revision to a commit hash, failing if it does not exist.
    pub fn rev_parse_commit(&self, rev: &str) -> Result<String> {
        let spec = format!("{rev}^{{commit}}");
        let stdout = self.run(&["rev-parse", "--verify", &spec])?;
        Ok(stdout.trim().to_string())
    }
}
