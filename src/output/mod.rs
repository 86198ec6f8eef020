//! How a sync run talks to the user.
//!
//! `core` reports progress through `ProgressSink`; the command layer turns
//! that and the final `SyncResult` into calls on an [`Output`]. The CLI
//! writes to the terminal, tests record what would have been written.

mod cli;

pub use cli::CliOutput;
pub use test::{OutputEntry, TestOutput};

/// Verbosity chosen on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// `--quiet` or `--json`: only warnings, errors and the JSON report.
    pub quiet: bool,
    /// `--verbose`: also each pipeline step and debug line.
    pub verbose: bool,
}

impl OutputConfig {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self { quiet, verbose }
    }
}

pub trait Output {
    /// Plain line of the report.
    fn info(&mut self, msg: &str);

    /// Headline of a run that changed the work tree.
    fn success(&mut self, msg: &str);

    /// Headline of a run that only looked (dry run).
    fn result(&mut self, msg: &str);

    /// `Key: value` line under a headline.
    fn detail(&mut self, key: &str, value: &str);

    /// One work-tree path in a listing of conflicts.
    fn path(&mut self, path: &str);

    /// Pipeline step, verbose only.
    fn step(&mut self, msg: &str);

    fn debug(&mut self, msg: &str);

    fn warning(&mut self, msg: &str);

    fn error(&mut self, msg: &str);

    /// The machine-readable report. Printed even when quiet.
    fn json(&mut self, document: &str);
}
