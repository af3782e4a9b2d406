use super::{finish, workspace};
use crate::cli::output::Verbosity;
use crate::errors::Result;
use crate::replay::{ReplayOptions, Replayer, RunMode};
use std::path::Path;

/// Reset every configured branch to its backup, then delete the backups
pub fn run(config_path: Option<&Path>, options: ReplayOptions) -> Result<()> {
    let workspace = workspace(config_path)?;
    let config = workspace.load_config()?;

    let mut replayer = Replayer::new(
        workspace.backend().quiet(options.verbosity > Verbosity::Normal),
        options,
    );
    let report = replayer.run(RunMode::Restore(&config))?;
    finish(&options.output(), &options, &report);
    Ok(())
}
