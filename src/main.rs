/// tracksync - Align a site directory with its remote branch
///
/// Runs the sync command and maps failures to the documented exit codes.
use tracksync::commands;
use tracksync::error::exit_code_for;
use tracksync::output::{CliOutput, Output};

fn main() {
    if let Err(e) = commands::sync::run() {
        CliOutput::default_output().error(&format!("{e:#}"));
        std::process::exit(exit_code_for(&e));
    }
}
