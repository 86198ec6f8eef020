//! tracksync - Align a site directory with its remote branch
//!
//! Parses the command line, resolves configuration, and renders the result
//! of `core::sync::execute`.

use crate::{
    core::{
        sync::{self, RemoteSpec, SyncParams, SyncResult},
        OutputSink,
    },
    error::SyncError,
    git::{is_git_available, GitCommand},
    logging::init_logging,
    output::{CliOutput, Output, OutputConfig},
    settings::SyncSettings,
    utils::{
        get_current_directory, prepare_destination, validate_branch_name, validate_remote_name,
        validate_remote_url,
    },
};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tracksync")]
#[command(version = crate::VERSION)]
#[command(about = "Align a directory's Git-tracked files with the tip of a remote branch")]
#[command(long_about = r#"
Makes the tracked files of DESTINATION identical to the tip of the remote's
default branch, without running `git clean`.

  1. Initializes a repository in DESTINATION if there is none, and points the
     remote (origin by default) at REMOTE_URL.
  2. Fetches the remote and resolves its default branch (origin/HEAD), falling
     back to tracksync.fallbackBranch (main).
  3. Finds untracked local files whose path the remote also tracks and moves
     them aside. No other untracked file is touched.
  4. Checks out the branch at the remote tip and hard-resets to it.

If step 4 fails, the files moved aside in step 3 are put back.

Configuration (git config):
  tracksync.url                      remote URL used when none is given
  tracksync.remote                   remote name (default: origin)
  tracksync.fallbackBranch           branch when origin/HEAD is unknown
  tracksync.experimental.gitoxide    use gitoxide for read-only queries
"#)]
pub struct Args {
    #[arg(help = "Remote repository URL [default: tracksync.url or the built-in site URL]")]
    pub remote_url: Option<String>,

    #[arg(help = "Directory to align [default: current directory]")]
    pub destination: Option<PathBuf>,

    #[arg(short, long, help = "Suppress all non-error output")]
    pub quiet: bool,

    #[arg(short, long, help = "Show each git command and its output")]
    pub verbose: bool,

    #[arg(
        short = 'n',
        long,
        help = "Report conflicting untracked files without changing the work tree"
    )]
    pub dry_run: bool,

    #[arg(
        long,
        help = "Keep replaced untracked files under .git/tracksync/quarantine after a successful run"
    )]
    pub keep_quarantine: bool,

    #[arg(long, help = "Print the result as JSON on stdout")]
    pub json: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    init_logging(args.quiet || args.json, args.verbose);

    let config = OutputConfig::new(args.quiet || args.json, args.verbose);
    let mut output = CliOutput::new(config);

    run_with_output(&args, &mut output)
}

/// Run the sync command with the given output implementation.
pub fn run_with_output(args: &Args, output: &mut dyn Output) -> Result<()> {
    if !is_git_available() {
        return Err(SyncError::GitUnavailable.into());
    }

    let destination = match &args.destination {
        Some(path) => path.clone(),
        None => get_current_directory()?,
    };
    let destination = prepare_destination(&destination)?;

    let settings = SyncSettings::load(&GitCommand::new(&destination, true))?;
    let params = build_params(args, destination, &settings)?;

    let result = {
        let mut sink = OutputSink(output);
        sync::execute(&params, &mut sink)?
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&result).context("Failed to serialize sync result")?;
        output.json(&json);
    } else {
        render_sync_result(&result, output);
    }

    Ok(())
}

fn build_params(
    args: &Args,
    destination: PathBuf,
    settings: &SyncSettings,
) -> Result<SyncParams> {
    let url = args
        .remote_url
        .clone()
        .unwrap_or_else(|| settings.url.clone());

    validate_remote_url(&url)?;
    validate_remote_name(&settings.remote)?;
    validate_branch_name(&settings.fallback_branch)
        .context("Invalid tracksync.fallbackBranch")?;

    Ok(SyncParams {
        destination,
        remote: RemoteSpec {
            name: settings.remote.clone(),
            url,
        },
        fallback_branch: settings.fallback_branch.clone(),
        dry_run: args.dry_run,
        keep_quarantine: args.keep_quarantine,
        quiet: !args.verbose,
        use_gitoxide: settings.use_gitoxide,
    })
}

fn render_sync_result(result: &SyncResult, output: &mut dyn Output) {
    let remote_ref = format!("{}/{}", result.remote_name, result.branch);
    let short_commit = result.commit.get(..7).unwrap_or(&result.commit);

    if result.initialized {
        output.info(&format!(
            "Initialized repository in {}",
            result.destination.display()
        ));
    }

    if result.dry_run {
        output.result(&format!(
            "Dry run: would align {} with {remote_ref} ({short_commit})",
            result.destination.display()
        ));
        if result.conflicts.is_empty() {
            output.info("No untracked files conflict with the remote.");
        } else {
            output.info("Untracked files that would be replaced:");
            for path in result.conflicts.iter() {
                output.path(path);
            }
        }
        return;
    }

    if !result.conflicts.is_empty() {
        output.info("Replaced untracked files with the remote version:");
        for path in result.conflicts.iter() {
            output.path(path);
        }
    }

    if let Some(ref quarantine) = result.quarantine {
        output.detail("Previous versions kept in", &quarantine.display().to_string());
    }

    output.success(&format!(
        "Tracked files aligned with {remote_ref} ({short_commit})"
    ));
    output.detail("Destination", &result.destination.display().to_string());
    output.detail("Remote", &result.remote_url);
}
