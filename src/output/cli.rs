use super::{Output, OutputConfig};
use crate::styles::{self, colors_enabled, colors_enabled_stderr};

/// Who gets to see a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Audience {
    /// Hidden by `--quiet`.
    Default,
    /// Needs `--verbose`, and is still hidden by `--quiet`.
    Verbose,
    /// Shown no matter what.
    Everyone,
}

/// Writes the report to stdout and diagnostics to stderr.
#[derive(Debug)]
pub struct CliOutput {
    config: OutputConfig,
}

impl CliOutput {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Unconfigured output for reporting a failure from `main`.
    pub fn default_output() -> Self {
        Self::new(OutputConfig::default())
    }

    fn shows(&self, audience: Audience) -> bool {
        match audience {
            Audience::Everyone => true,
            Audience::Default => !self.config.quiet,
            Audience::Verbose => self.config.verbose && !self.config.quiet,
        }
    }

    fn stdout(&self, audience: Audience, style: Option<&str>, line: &str) {
        if !self.shows(audience) {
            return;
        }
        match style {
            Some(style) if colors_enabled() => println!("{style}{line}{}", styles::RESET),
            _ => println!("{line}"),
        }
    }

    fn stderr(&self, label: &str, color: &str, msg: &str) {
        if colors_enabled_stderr() {
            eprintln!("{color}{label}:{} {msg}", styles::RESET);
        } else {
            eprintln!("{label}: {msg}");
        }
    }
}

impl Output for CliOutput {
    fn info(&mut self, msg: &str) {
        self.stdout(Audience::Default, None, msg);
    }

    fn success(&mut self, msg: &str) {
        self.stdout(Audience::Default, Some(styles::GREEN), msg);
    }

    fn result(&mut self, msg: &str) {
        self.stdout(Audience::Default, Some(styles::BOLD), msg);
    }

    fn detail(&mut self, key: &str, value: &str) {
        if !self.shows(Audience::Default) {
            return;
        }
        if colors_enabled() {
            println!("  {}{key}:{} {value}", styles::BOLD, styles::RESET);
        } else {
            println!("  {key}: {value}");
        }
    }

    fn path(&mut self, path: &str) {
        self.stdout(Audience::Default, None, &format!(" - {path}"));
    }

    fn step(&mut self, msg: &str) {
        self.stdout(Audience::Verbose, Some(styles::DIM), msg);
    }

    fn debug(&mut self, msg: &str) {
        self.stdout(Audience::Verbose, Some(styles::DIM), &format!("debug: {msg}"));
    }

    fn warning(&mut self, msg: &str) {
        self.stderr("warning", styles::YELLOW, msg);
    }

    fn error(&mut self, msg: &str) {
        self.stderr("error", styles::RED, msg);
    }

    fn json(&mut self, document: &str) {
        if self.shows(Audience::Everyone) {
            println!("{}", document.trim_end());
        }
    }
}
