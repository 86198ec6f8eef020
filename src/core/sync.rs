//! Core logic for aligning a work tree with a remote branch tip.
//!
//! The pipeline is strictly sequential:
//! init/configure → fetch → resolve branch → compute conflicts →
//! stash conflicts → checkout + hard reset.
//!
//! Untracked files are only ever moved out of the way when their path is
//! also tracked by the remote. `git clean` is never run.

use crate::core::conflicts::{find_shadowed, ConflictSet, ShadowedPath};
use crate::core::quarantine::Quarantine;
use crate::core::ProgressSink;
use crate::error::SyncError;
use crate::git::GitCommand;
use crate::utils::validate_branch_name;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

/// The remote a destination is aligned with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSpec {
    pub name: String,
    pub url: String,
}

/// Input parameters for the sync operation.
#[derive(Debug)]
pub struct SyncParams {
    /// Work tree to align. Must already exist.
    pub destination: PathBuf,
    pub remote: RemoteSpec,
    /// Branch used when the remote's default branch cannot be resolved.
    pub fallback_branch: String,
    /// Stop after computing conflicts.
    pub dry_run: bool,
    /// Leave quarantined conflicts on disk after a successful run.
    pub keep_quarantine: bool,
    pub quiet: bool,
    pub use_gitoxide: bool,
}

/// Outcome of a sync run.
#[derive(Debug, Serialize)]
pub struct SyncResult {
    pub destination: PathBuf,
    pub remote_name: String,
    pub remote_url: String,
    pub branch: String,
    /// Commit the work tree now matches (or would match, on a dry run).
    pub commit: String,
    /// True when `git init` ran during this sync.
    pub initialized: bool,
    /// Untracked paths replaced by the remote's version.
    pub conflicts: ConflictSet,
    pub dry_run: bool,
    /// Where replaced entries were kept, when asked to keep them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarantine: Option<PathBuf>,
}

/// Conflicts between a remote tree and the local untracked entries.
#[derive(Debug)]
pub struct ConflictReport {
    pub conflicts: ConflictSet,
    pub shadowed: Vec<ShadowedPath>,
    /// Number of paths in the remote tree.
    pub tracked_count: usize,
}

/// Make sure `git` points at a repository whose `remote` has the right URL.
///
/// Returns true when the repository was created by this call.
pub fn ensure_initialized(
    git: &GitCommand,
    remote: &RemoteSpec,
    progress: &mut dyn ProgressSink,
) -> Result<bool> {
    let initialized = if git.has_git_metadata() {
        false
    } else {
        progress.on_step(&format!(
            "Initializing repository in '{}'",
            git.work_dir().display()
        ));
        git.init()?;
        true
    };

    if git.remote_exists(&remote.name)? {
        progress.on_step(&format!(
            "Setting URL of remote '{}' to {}",
            remote.name, remote.url
        ));
        git.remote_set_url(&remote.name, &remote.url)?;
    } else {
        progress.on_step(&format!("Adding remote '{}' -> {}", remote.name, remote.url));
        git.remote_add(&remote.name, &remote.url)?;
    }

    Ok(initialized)
}

/// Fetch `remote` and refresh its `HEAD` pointer.
///
/// A remote that does not advertise a HEAD is not an error; branch
/// resolution falls back instead.
pub fn fetch_remote(
    git: &GitCommand,
    remote: &str,
    progress: &mut dyn ProgressSink,
) -> Result<()> {
    progress.on_step(&format!("Fetching {remote}"));
    git.fetch(remote)?;

    if let Err(e) = git.remote_set_head_auto(remote) {
        progress.on_debug(&format!("Could not refresh {remote}/HEAD: {e}"));
    }
    Ok(())
}

/// Strip the `<remote>/` prefix from a short remote-tracking ref name.
///
/// `None` when the name has no branch part or only names `HEAD` itself.
pub fn branch_from_remote_ref(short_ref: &str, remote: &str) -> Option<String> {
    let short_ref = short_ref.trim();
    let branch = match short_ref.strip_prefix(&format!("{remote}/")) {
        Some(branch) => branch,
        None => short_ref.split_once('/')?.1,
    };
    if branch.is_empty() || branch == "HEAD" {
        return None;
    }
    Some(branch.to_string())
}

/// Name the branch the remote considers its default.
///
/// Tries the symbolic `refs/remotes/<remote>/HEAD`, then the
/// `<remote>/HEAD` alias, then settles for `fallback`. Never fails.
pub fn resolve_default_branch(
    git: &GitCommand,
    remote: &str,
    fallback: &str,
    progress: &mut dyn ProgressSink,
) -> String {
    let symbolic = || {
        git.symbolic_ref_short(&format!("refs/remotes/{remote}/HEAD"))
            .ok()
            .flatten()
    };
    let alias = || {
        git.rev_parse_abbrev_ref(&format!("{remote}/HEAD"))
            .ok()
            .flatten()
    };
    first_default_branch(&[&symbolic, &alias], remote, fallback, progress)
}

/// Run `queries` in order and take the first usable `<remote>/<branch>`
/// answer. Later queries are not run once one succeeds.
fn first_default_branch(
    queries: &[&dyn Fn() -> Option<String>],
    remote: &str,
    fallback: &str,
    progress: &mut dyn ProgressSink,
) -> String {
    for query in queries {
        let Some(short_ref) = query() else {
            continue;
        };
        let Some(branch) = branch_from_remote_ref(&short_ref, remote) else {
            continue;
        };
        match validate_branch_name(&branch) {
            Ok(()) => {
                progress.on_debug(&format!("{remote}/HEAD -> {short_ref}"));
                return branch;
            }
            Err(e) => progress.on_warning(&format!("Ignoring remote default branch: {e}")),
        }
    }

    progress.on_debug(&format!("{remote}/HEAD is unknown, using '{fallback}'"));
    fallback.to_string()
}

/// Compare the fetched tree of `<remote>/<branch>` with the untracked
/// entries of the work tree.
///
/// Read-only: the fetch must already have happened.
pub fn compute_conflicts(git: &GitCommand, remote: &str, branch: &str) -> Result<ConflictReport> {
    let tracked = git.ls_tree_paths(&remote_tracking_ref(remote, branch))?;
    let untracked = git.ls_untracked()?;

    Ok(ConflictReport {
        conflicts: ConflictSet::between(&tracked, &untracked),
        shadowed: find_shadowed(&tracked, &untracked),
        tracked_count: tracked.len(),
    })
}

/// Move every conflicting entry out of the work tree into a quarantine.
///
/// If any move fails, the entries moved so far are put back before the
/// error is returned.
pub fn remove_conflicts(
    git: &GitCommand,
    conflicts: &ConflictSet,
    progress: &mut dyn ProgressSink,
) -> Result<Quarantine> {
    let git_dir = git.absolute_git_dir()?;
    let mut quarantine = Quarantine::new(&git_dir, git.work_dir());

    for path in conflicts.iter() {
        progress.on_step(&format!("Removing conflicting untracked entry: {path}"));
        if let Err(e) = quarantine.stash(path) {
            if let Err(restore_err) = quarantine.restore() {
                progress.on_warning(&format!(
                    "Could not put back quarantined entries: {restore_err:#}"
                ));
            }
            return Err(e);
        }
    }

    Ok(quarantine)
}

/// Point `branch` at the remote tip and force index and work tree to match.
///
/// Local edits to tracked files are discarded. Untracked files are left alone.
pub fn align(
    git: &GitCommand,
    remote: &str,
    branch: &str,
    progress: &mut dyn ProgressSink,
) -> Result<()> {
    let tip = remote_tracking_ref(remote, branch);

    progress.on_step(&format!("Checking out '{branch}' at {remote}/{branch}"));
    git.checkout_force_branch(branch, &tip)?;

    progress.on_step(&format!("Resetting work tree to {remote}/{branch}"));
    git.reset_hard(&tip)?;
    Ok(())
}

/// Run the whole pipeline.
pub fn execute(params: &SyncParams, progress: &mut dyn ProgressSink) -> Result<SyncResult> {
    let git = GitCommand::new(&params.destination, params.quiet)
        .with_gitoxide(params.use_gitoxide);
    let remote = &params.remote;

    let initialized = ensure_initialized(&git, remote, progress)?;
    fetch_remote(&git, &remote.name, progress)?;

    let branch = resolve_default_branch(&git, &remote.name, &params.fallback_branch, progress);

    // The tip must exist before anything is removed from the work tree.
    let commit = git.rev_parse_commit(&remote_tracking_ref(&remote.name, &branch))?;

    let report = compute_conflicts(&git, &remote.name, &branch)?;
    progress.on_debug(&format!(
        "{} remote paths, {} conflicting untracked entries",
        report.tracked_count,
        report.conflicts.len()
    ));

    if !report.shadowed.is_empty() {
        return Err(SyncError::ShadowedPaths {
            paths: report.shadowed.iter().map(ToString::to_string).collect(),
        }
        .into());
    }

    let mut result = SyncResult {
        destination: params.destination.clone(),
        remote_name: remote.name.clone(),
        remote_url: remote.url.clone(),
        branch,
        commit,
        initialized,
        conflicts: report.conflicts,
        dry_run: params.dry_run,
        quarantine: None,
    };

    if params.dry_run {
        return Ok(result);
    }

    let quarantine = remove_conflicts(&git, &result.conflicts, progress)?;

    if let Err(e) = align(&git, &remote.name, &result.branch, progress) {
        if !quarantine.is_empty() {
            let root = quarantine.root().to_path_buf();
            match quarantine.restore() {
                Ok(restored) => progress.on_warning(&format!(
                    "Alignment failed; restored {} quarantined entr{}",
                    restored.len(),
                    if restored.len() == 1 { "y" } else { "ies" }
                )),
                Err(restore_err) => progress.on_warning(&format!(
                    "Alignment failed and quarantined entries could not be restored ({restore_err:#}); they remain in {}",
                    root.display()
                )),
            }
        }
        return Err(e);
    }

    if params.keep_quarantine {
        result.quarantine = quarantine.keep();
    } else if let Err(e) = quarantine.discard() {
        progress.on_warning(&format!("{e:#}"));
    }

    Ok(result)
}

fn remote_tracking_ref(remote: &str, branch: &str) -> String {
    format!("refs/remotes/{remote}/{branch}")
}
