//! Fixtures shared by the integration tests: a source repository playing the
//! remote, and helpers to run git against arbitrary directories.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Variables a parent git process (e.g. a hook) may export that would
/// redirect our git invocations to the wrong repository.
const GIT_ENV_VARS: &[&str] = &[
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_OBJECT_DIRECTORY",
    "GIT_ALTERNATE_OBJECT_DIRECTORIES",
    "GIT_COMMON_DIR",
];

pub fn git_cmd() -> Command {
    let mut cmd = Command::new("git");
    for var in GIT_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.args([
        "-c",
        "user.name=Test",
        "-c",
        "user.email=test@test.com",
        "-c",
        "commit.gpgsign=false",
    ]);
    cmd
}

/// Run git in `dir`, panicking with its stderr on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = git_cmd()
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

/// Whether git exits successfully in `dir`.
pub fn git_ok(dir: &Path, args: &[&str]) -> bool {
    git_cmd()
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// The repository a destination gets aligned with.
pub struct SourceRepo {
    dir: TempDir,
}

impl SourceRepo {
    /// A repository on `branch` with one commit holding `files`.
    pub fn new(branch: &str, files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        git(dir.path(), &["init", "--quiet", "--initial-branch", branch]);
        let repo = Self { dir };
        repo.commit(files, "initial");
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// URL handed to tracksync.
    pub fn url(&self) -> String {
        self.dir.path().to_str().unwrap().to_string()
    }

    pub fn commit(&self, files: &[(&str, &str)], message: &str) -> String {
        for (path, content) in files {
            write_file(self.path(), path, content);
        }
        git(self.path(), &["add", "--all"]);
        git(self.path(), &["commit", "--quiet", "-m", message]);
        self.head()
    }

    pub fn head(&self) -> String {
        git(self.path(), &["rev-parse", "HEAD"])
    }

    /// Point HEAD at a branch that does not exist, so the remote advertises
    /// no default branch.
    pub fn orphan_head(&self) {
        git(self.path(), &["symbolic-ref", "HEAD", "refs/heads/unborn"]);
    }
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn read_file(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

/// A fresh, not yet existing destination inside its own temp dir.
pub fn destination() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("site");
    (dir, dest)
}

/// Quarantine batches left under the destination's git dir.
pub fn quarantine_batches(dest: &Path) -> Vec<PathBuf> {
    let root = dest.join(".git/tracksync/quarantine");
    match fs::read_dir(root) {
        Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
        Err(_) => Vec::new(),
    }
}
