//! Gitoxide-based implementations of read-only git queries.
//!
//! Each function provides a native Rust alternative to a git subprocess call.
//! These are called from `GitCommand` methods when
//! `tracksync.experimental.gitoxide` is enabled. Anything that writes to the
//! repository stays on the git CLI.

use anyhow::{Context, Result};
use gix::bstr::ByteSlice;
use gix::Repository;
use std::collections::BTreeSet;

/// gitoxide equivalent of `git remote`
pub fn remote_list(repo: &Repository) -> Result<Vec<String>> {
    Ok(repo
        .remote_names()
        .iter()
        .map(|name| name.to_string())
        .collect())
}

/// gitoxide equivalent of `git symbolic-ref --short <ref_name>`
pub fn symbolic_ref_short(repo: &Repository, ref_name: &str) -> Result<String> {
    let reference = repo
        .find_reference(ref_name)
        .with_context(|| format!("Failed to find reference '{ref_name}'"))?;
    match reference.target() {
        gix::refs::TargetRef::Symbolic(target) => Ok(target.shorten().to_string()),
        gix::refs::TargetRef::Object(_) => {
            anyhow::bail!("'{ref_name}' is not a symbolic reference")
        }
    }
}

/// gitoxide equivalent of `git ls-tree -r -z --name-only <rev>`
pub fn ls_tree_paths(repo: &Repository, rev: &str) -> Result<BTreeSet<String>> {
    let tree = repo
        .rev_parse_single(rev.as_bytes())
        .with_context(|| format!("Failed to resolve '{rev}'"))?
        .object()
        .with_context(|| format!("Failed to read object for '{rev}'"))?
        .peel_to_tree()
        .with_context(|| format!("'{rev}' does not point to a tree"))?;

    let mut recorder = gix::traverse::tree::Recorder::default();
    tree.traverse()
        .breadthfirst(&mut recorder)
        .with_context(|| format!("Failed to walk tree of '{rev}'"))?;

    recorder
        .records
        .into_iter()
        .filter(|entry| !entry.mode.is_tree())
        .map(|entry| {
            entry
                .filepath
                .to_str()
                .map(|s| s.to_string())
                .with_context(|| format!("Path is not valid UTF-8: {}", entry.filepath))
        })
        .collect()
}
