pub mod commands;
pub mod output;

use crate::errors::Result;
use crate::replay::ReplayOptions;
use clap::{ArgAction, Parser, Subcommand};
use output::Verbosity;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-replay")]
#[command(about = "Replay declared rebases and stages onto a git repository")]
#[command(version, disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (defaults to git-replay.yaml at the repository root)
    pub config: Option<PathBuf>,

    /// Show the commands that would run without running them
    #[arg(long, short = 'n', global = true)]
    pub dry_run: bool,

    /// Print less; repeat (-qq) to print only warnings and errors
    #[arg(long, short, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Print only warnings, summaries and errors
    #[arg(long, global = true)]
    pub quieter: bool,

    /// Save each branch as git-replay/<branch> before changing it
    #[arg(long, global = true)]
    pub back_up: bool,

    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print version
    #[arg(long, short = 'v', action = ArgAction::Version)]
    pub version: Option<bool>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reset branches to their backups and delete the backups
    Restore {
        /// Configuration file naming the branches to restore
        config: Option<PathBuf>,
    },

    /// Delete every backup branch
    Clean,

    /// Show version information
    Version,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        self.setup_logging();
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        let options = self.options();
        match self.command {
            None => commands::replay::run(self.config.as_deref(), options),
            Some(Commands::Restore { config }) => {
                commands::restore::run(config.as_deref().or(self.config.as_deref()), options)
            }
            Some(Commands::Clean) => commands::clean::run(options),
            Some(Commands::Version) => commands::version::run(),
        }
    }

    pub fn options(&self) -> ReplayOptions {
        ReplayOptions {
            dry_run: self.dry_run,
            back_up: self.back_up,
            verbosity: Verbosity::from_flags(self.quiet, self.quieter),
        }
    }

    fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        };

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr);

        if self.no_color {
            subscriber.with_ansi(false).init();
        } else {
            subscriber.init();
        }
    }
}
