use super::{finish, workspace};
use crate::cli::output::Verbosity;
use crate::errors::{ReplayError, Result};
use crate::replay::{ReplayOptions, Replayer, RunMode, RunReport};
use std::path::Path;
use tracing::debug;

/// Run the declared rebases and stages
pub fn run(config_path: Option<&Path>, options: ReplayOptions) -> Result<()> {
    let output = options.output();
    match replay(config_path, options) {
        Ok(report) => {
            finish(&output, &options, &report);
            Ok(())
        }
        Err(err @ ReplayError::BranchCreation { .. }) => {
            output.error(&err);
            std::process::exit(1);
        }
        Err(err) => {
            // Environment errors stop the run before any branch moves
            if options.back_up && !options.dry_run && !err.is_environment() {
                output.tip("Run `git-replay restore` to reset the branches to their backups");
            }
            Err(err)
        }
    }
}

fn replay(config_path: Option<&Path>, options: ReplayOptions) -> Result<RunReport> {
    let workspace = workspace(config_path)?;
    let config = workspace.load_config()?;
    debug!(
        "{} rebase group(s), {} stage group(s)",
        config.rebase.len(),
        config.stage.len()
    );

    let mut replayer = Replayer::new(
        workspace.backend().quiet(options.verbosity > Verbosity::Normal),
        options,
    );
    replayer.run(RunMode::Replay(&config))
}
