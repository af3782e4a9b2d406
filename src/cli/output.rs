use console::{style, StyledObject};
use std::fmt::Display;

/// How much progress output to print
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Commands, progress and notices
    #[default]
    Normal,
    /// Per-branch notices only
    Quiet,
    /// Warnings, summaries and errors only
    Quieter,
}

impl Verbosity {
    /// `-q` once is quiet, twice (or `--quieter`) is quieter
    pub fn from_flags(quiet: u8, quieter: bool) -> Self {
        match (quiet, quieter) {
            (_, true) => Verbosity::Quieter,
            (0, false) => Verbosity::Normal,
            (1, false) => Verbosity::Quiet,
            _ => Verbosity::Quieter,
        }
    }
}

/// Centralized output formatting for the replay transcript.
///
/// Lines are filtered by verbosity and, in dry-run, marked as simulated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    verbosity: Verbosity,
    dry_run: bool,
}

impl Output {
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self { verbosity, dry_run }
    }

    fn marker(&self) -> String {
        if self.dry_run {
            format!("{} ", style("[dry-run]").magenta())
        } else {
            String::new()
        }
    }

    fn emit(&self, max: Verbosity, prefix: StyledObject<&str>, message: impl Display) {
        if self.verbosity <= max {
            println!("{}{} {}", self.marker(), prefix, message);
        }
    }

    /// Print a backend command about to run
    pub fn command<T: Display>(&self, command: T) {
        if self.verbosity == Verbosity::Normal {
            println!("{}  {}", self.marker(), style(command).yellow());
        }
    }

    /// Print a section header
    pub fn section<T: Display>(&self, title: T) {
        if self.verbosity == Verbosity::Normal {
            println!("\n{}{}", self.marker(), style(title).bold().underlined());
        }
    }

    /// Print progress indicator
    pub fn progress<T: Display>(&self, message: T) {
        self.emit(Verbosity::Normal, style("→").cyan(), message);
    }

    /// Print a success message with checkmark
    pub fn success<T: Display>(&self, message: T) {
        self.emit(Verbosity::Quiet, style("✓").green(), message);
    }

    /// Print an info message
    pub fn info<T: Display>(&self, message: T) {
        self.emit(Verbosity::Quiet, style("ℹ").cyan(), message);
    }

    /// Print a warning message
    pub fn warning<T: Display>(&self, message: T) {
        self.emit(Verbosity::Quieter, style("⚠").yellow(), message);
    }

    /// Print a bullet point
    pub fn bullet<T: Display>(&self, message: T) {
        println!("{}  {} {}", self.marker(), style("•").dim(), message);
    }

    /// Print a tip/suggestion
    pub fn tip<T: Display>(&self, message: T) {
        println!(
            "{}{} {}",
            self.marker(),
            style("TIP:").cyan(),
            style(message).dim()
        );
    }

    /// Print an end-of-run summary line; never suppressed
    pub fn summary<T: Display>(&self, message: T) {
        println!("{}{}", self.marker(), style(message).bold());
    }

    /// Print an error message; never suppressed
    pub fn error<T: Display>(&self, message: T) {
        eprintln!("{}{} {}", self.marker(), style("✗").red(), message);
    }

    /// Print the end-of-run block of divergence notices
    pub fn divergence_summary(&self, notices: &[String]) {
        if notices.is_empty() {
            return;
        }
        println!();
        self.warning(format!(
            "{} branch(es) differ from their upstream:",
            notices.len()
        ));
        for notice in notices {
            self.bullet(notice);
        }
    }
}
