//! End-to-end tests of the sync pipeline against real repositories.

mod common;

use common::{destination, git, git_ok, quarantine_batches, read_file, write_file, SourceRepo};
use std::path::Path;
use tracksync::core::sync::{self, RemoteSpec, SyncParams, SyncResult};
use tracksync::core::NullSink;
use tracksync::error::{exit_code_for, EXIT_UNUSABLE_DESTINATION};
use tracksync::utils::prepare_destination;

fn params(dest: &Path, source: &SourceRepo) -> SyncParams {
    SyncParams {
        destination: prepare_destination(dest).unwrap(),
        remote: RemoteSpec {
            name: "origin".to_string(),
            url: source.url(),
        },
        fallback_branch: "main".to_string(),
        dry_run: false,
        keep_quarantine: false,
        quiet: true,
        use_gitoxide: false,
    }
}

fn run(params: &SyncParams) -> anyhow::Result<SyncResult> {
    sync::execute(params, &mut NullSink)
}

fn site() -> SourceRepo {
    SourceRepo::new(
        "main",
        &[
            ("index.html", "<h1>remote</h1>"),
            ("css/site.css", "body {}"),
            ("blog/first.html", "first"),
        ],
    )
}

#[test]
fn test_sync_into_missing_directory() {
    let source = site();
    let (_tmp, dest) = destination();

    let result = run(&params(&dest, &source)).unwrap();

    assert!(result.initialized);
    assert_eq!(result.branch, "main");
    assert_eq!(result.commit, source.head());
    assert!(result.conflicts.is_empty());
    assert_eq!(read_file(&dest, "index.html"), "<h1>remote</h1>");
    assert_eq!(read_file(&dest, "css/site.css"), "body {}");
    assert_eq!(git(&dest, &["rev-parse", "HEAD"]), source.head());
    assert_eq!(git(&dest, &["symbolic-ref", "--short", "HEAD"]), "main");
    assert_eq!(git(&dest, &["remote", "get-url", "origin"]), source.url());
}

#[test]
fn test_untracked_files_without_remote_counterpart_survive() {
    let source = site();
    let (_tmp, dest) = destination();
    write_file(&dest, "draft.html", "work in progress");
    write_file(&dest, "uploads/photo.jpg", "jpeg");

    let result = run(&params(&dest, &source)).unwrap();

    assert!(result.conflicts.is_empty());
    assert_eq!(read_file(&dest, "draft.html"), "work in progress");
    assert_eq!(read_file(&dest, "uploads/photo.jpg"), "jpeg");
}

#[test]
fn test_colliding_untracked_file_is_replaced() {
    let source = site();
    let (_tmp, dest) = destination();
    write_file(&dest, "index.html", "<h1>local</h1>");
    write_file(&dest, "blog/first.html", "local first");
    write_file(&dest, "blog/second.html", "local second");

    let result = run(&params(&dest, &source)).unwrap();

    assert_eq!(result.conflicts.to_vec(), vec!["blog/first.html", "index.html"]);
    assert_eq!(read_file(&dest, "index.html"), "<h1>remote</h1>");
    assert_eq!(read_file(&dest, "blog/first.html"), "first");
    assert_eq!(read_file(&dest, "blog/second.html"), "local second");
    assert!(result.quarantine.is_none());
    assert!(quarantine_batches(&dest).is_empty());
}

#[test]
fn test_second_run_is_idempotent() {
    let source = site();
    let (_tmp, dest) = destination();
    write_file(&dest, "draft.html", "draft");

    let first = run(&params(&dest, &source)).unwrap();
    let second = run(&params(&dest, &source)).unwrap();

    assert!(first.initialized);
    assert!(!second.initialized);
    assert_eq!(first.commit, second.commit);
    assert!(second.conflicts.is_empty());
    assert_eq!(read_file(&dest, "draft.html"), "draft");
    assert_eq!(git(&dest, &["status", "--porcelain", "--untracked-files=no"]), "");
}

#[test]
fn test_local_edits_to_tracked_files_are_discarded() {
    let source = site();
    let (_tmp, dest) = destination();
    run(&params(&dest, &source)).unwrap();

    write_file(&dest, "index.html", "edited on the server");
    std::fs::remove_file(dest.join("css/site.css")).unwrap();
    run(&params(&dest, &source)).unwrap();

    assert_eq!(read_file(&dest, "index.html"), "<h1>remote</h1>");
    assert_eq!(read_file(&dest, "css/site.css"), "body {}");
}

#[test]
fn test_local_edit_overwritten_when_remote_changes_same_file() {
    let source = site();
    let (_tmp, dest) = destination();
    run(&params(&dest, &source)).unwrap();

    write_file(&dest, "index.html", "hotfix made on the server");
    let tip = source.commit(&[("index.html", "<h1>v2</h1>")], "update home");
    let result = run(&params(&dest, &source)).unwrap();

    assert_eq!(result.commit, tip);
    assert_eq!(read_file(&dest, "index.html"), "<h1>v2</h1>");
    assert_eq!(git(&dest, &["rev-parse", "HEAD"]), tip);
    assert_eq!(git(&dest, &["status", "--porcelain"]), "");
}

#[test]
fn test_new_remote_commits_are_picked_up() {
    let source = site();
    let (_tmp, dest) = destination();
    run(&params(&dest, &source)).unwrap();

    let tip = source.commit(&[("blog/second.html", "second")], "add post");
    write_file(&dest, "blog/second.html", "stale copy");
    let result = run(&params(&dest, &source)).unwrap();

    assert_eq!(result.commit, tip);
    assert_eq!(result.conflicts.to_vec(), vec!["blog/second.html"]);
    assert_eq!(read_file(&dest, "blog/second.html"), "second");
}

#[test]
fn test_remote_default_branch_is_followed() {
    let source = SourceRepo::new("trunk", &[("index.html", "trunk")]);
    let (_tmp, dest) = destination();

    let result = run(&params(&dest, &source)).unwrap();

    assert_eq!(result.branch, "trunk");
    assert_eq!(git(&dest, &["symbolic-ref", "--short", "HEAD"]), "trunk");
    assert_eq!(read_file(&dest, "index.html"), "trunk");
}

#[test]
fn test_fallback_branch_when_remote_head_is_unknown() {
    let source = site();
    source.orphan_head();
    let (_tmp, dest) = destination();

    let result = run(&params(&dest, &source)).unwrap();

    assert_eq!(result.branch, "main");
    assert_eq!(read_file(&dest, "index.html"), "<h1>remote</h1>");
}

#[test]
fn test_missing_fallback_branch_fails_before_touching_files() {
    let source = SourceRepo::new("trunk", &[("index.html", "trunk")]);
    source.orphan_head();
    let (_tmp, dest) = destination();
    write_file(&dest, "index.html", "local");

    let err = run(&params(&dest, &source)).unwrap_err();

    assert_ne!(exit_code_for(&err), 0);
    assert_eq!(read_file(&dest, "index.html"), "local");
}

#[test]
fn test_existing_remote_url_is_replaced() {
    let old = site();
    let source = SourceRepo::new("main", &[("index.html", "new home")]);
    let (_tmp, dest) = destination();
    run(&params(&dest, &old)).unwrap();

    let result = run(&params(&dest, &source)).unwrap();

    assert_eq!(git(&dest, &["remote", "get-url", "origin"]), source.url());
    assert_eq!(result.commit, source.head());
    assert_eq!(read_file(&dest, "index.html"), "new home");
}

#[test]
fn test_dry_run_changes_no_files() {
    let source = site();
    let (_tmp, dest) = destination();
    write_file(&dest, "index.html", "local");

    let mut params = params(&dest, &source);
    params.dry_run = true;
    let result = run(&params).unwrap();

    assert!(result.dry_run);
    assert_eq!(result.commit, source.head());
    assert_eq!(result.conflicts.to_vec(), vec!["index.html"]);
    assert_eq!(read_file(&dest, "index.html"), "local");
    assert!(!dest.join("css").exists());
    assert!(!git_ok(&dest, &["rev-parse", "--verify", "--quiet", "HEAD"]));
}

#[test]
fn test_keep_quarantine_preserves_replaced_files() {
    let source = site();
    let (_tmp, dest) = destination();
    write_file(&dest, "index.html", "local");

    let mut params = params(&dest, &source);
    params.keep_quarantine = true;
    let result = run(&params).unwrap();

    let kept = result.quarantine.expect("quarantine should be kept");
    assert_eq!(read_file(&kept, "index.html"), "local");
    assert_eq!(read_file(&dest, "index.html"), "<h1>remote</h1>");
    assert_eq!(quarantine_batches(&dest).len(), 1);
    // The quarantine lives inside .git and is never reported as untracked
    assert_eq!(git(&dest, &["status", "--porcelain"]), "");
}

#[test]
fn test_shadowed_paths_abort_without_removing_anything() {
    let source = site();
    let (_tmp, dest) = destination();
    write_file(&dest, "index.html", "local");
    // An untracked file where the remote needs the `blog/` directory
    write_file(&dest, "blog", "not a directory");

    let err = run(&params(&dest, &source)).unwrap_err();

    assert_eq!(exit_code_for(&err), EXIT_UNUSABLE_DESTINATION);
    assert!(format!("{err:#}").contains("blog/first.html"));
    assert_eq!(read_file(&dest, "index.html"), "local");
    assert_eq!(read_file(&dest, "blog"), "not a directory");
    assert!(quarantine_batches(&dest).is_empty());
}

#[test]
fn test_unreachable_remote_propagates_git_status() {
    let (_tmp, dest) = destination();
    let missing = tempfile::TempDir::new().unwrap();
    let mut params = SyncParams {
        destination: prepare_destination(&dest).unwrap(),
        remote: RemoteSpec {
            name: "origin".to_string(),
            url: missing.path().join("nowhere").to_str().unwrap().to_string(),
        },
        fallback_branch: "main".to_string(),
        dry_run: false,
        keep_quarantine: false,
        quiet: true,
        use_gitoxide: false,
    };
    write_file(&dest, "index.html", "local");

    let err = run(&params).unwrap_err();
    assert_eq!(exit_code_for(&err), 128);
    assert_eq!(read_file(&dest, "index.html"), "local");

    params.dry_run = true;
    assert!(run(&params).is_err());
}

#[test]
fn test_gitoxide_backend_matches_cli() {
    let source = site();
    let (_tmp, dest) = destination();
    write_file(&dest, "index.html", "local");
    write_file(&dest, "draft.html", "draft");

    let mut params = params(&dest, &source);
    params.use_gitoxide = true;
    let result = run(&params).unwrap();

    assert_eq!(result.branch, "main");
    assert_eq!(result.conflicts.to_vec(), vec!["index.html"]);
    assert_eq!(read_file(&dest, "index.html"), "<h1>remote</h1>");
    assert_eq!(read_file(&dest, "draft.html"), "draft");
}
