use super::{finish, workspace};
use crate::cli::output::Verbosity;
use crate::errors::Result;
use crate::replay::{ReplayOptions, Replayer, RunMode};

/// Delete every backup branch; needs a repository but no configuration
pub fn run(options: ReplayOptions) -> Result<()> {
    let workspace = workspace(None)?;

    let mut replayer = Replayer::new(
        workspace.backend().quiet(options.verbosity > Verbosity::Normal),
        options,
    );
    let report = replayer.run(RunMode::Clean)?;
    finish(&options.output(), &options, &report);
    Ok(())
}
