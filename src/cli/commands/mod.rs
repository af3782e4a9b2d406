pub mod clean;
pub mod replay;
pub mod restore;
pub mod version;

use crate::cli::output::Output;
use crate::errors::Result;
use crate::replay::{ReplayOptions, RunReport, Workspace};
use std::env;
use std::path::Path;

/// Discover the repository from the current directory
fn workspace(config_path: Option<&Path>) -> Result<Workspace> {
    let cwd = env::current_dir()?;
    Workspace::discover(&cwd, config_path)
}

/// Print the dry-run footer
fn finish(output: &Output, options: &ReplayOptions, report: &RunReport) {
    if options.dry_run {
        output.summary(format!(
            "{} command(s) would have run",
            report.commands.len()
        ));
    }
}
