use crate::config::{resolve_config_path, ReplayConfig};
use crate::errors::Result;
use crate::git::{find_repository_root, Backend, ProcessBackend};
use crate::replay::Replayer;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What a run does
#[derive(Debug, Clone, Copy)]
pub enum RunMode<'a> {
    /// Rebase, then stage, as the configuration declares
    Replay(&'a ReplayConfig),
    /// Reset the configuration's branches to their backups
    Restore(&'a ReplayConfig),
    /// Delete every backup branch
    Clean,
}

/// What a completed run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Mutating commands, executed or simulated, in order
    pub commands: Vec<String>,
    /// Divergence notices, in the order they were recorded
    pub divergences: Vec<String>,
}

/// A validated repository and configuration path
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config_path: PathBuf,
}

impl Workspace {
    /// Locate the repository containing `start` and resolve the configuration
    /// path against it. Fails before anything is mutated.
    pub fn discover(start: &Path, config_path: Option<&Path>) -> Result<Self> {
        let root = find_repository_root(start)?;
        let explicit = config_path.map(|path| start.join(path));
        let config_path = resolve_config_path(&root, explicit.as_deref());
        debug!(
            "repository at {}, configuration at {}",
            root.display(),
            config_path.display()
        );
        Ok(Self { root, config_path })
    }

    /// Read the configuration file
    pub fn load_config(&self) -> Result<ReplayConfig> {
        ReplayConfig::load(&self.config_path)
    }

    pub fn backend(&self) -> ProcessBackend {
        ProcessBackend::new(&self.root)
    }
}

impl<B: Backend> Replayer<B> {
    /// Execute one run to completion or to the first unrecoverable error
    pub fn run(&mut self, mode: RunMode<'_>) -> Result<RunReport> {
        if self.options.dry_run {
            self.output
                .warning("Dry run: commands are shown but not executed");
        }

        match mode {
            RunMode::Restore(config) => self.restore_backup(config)?,
            RunMode::Clean => self.delete_backup()?,
            RunMode::Replay(config) => {
                if config.is_empty() {
                    self.output.info("Nothing to replay");
                }
                self.run_rebases(config)?;
                self.run_stages(config)?;
                self.output.divergence_summary(&self.divergences);
            }
        }

        Ok(self.report())
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            commands: self.transcript.iter().map(ToString::to_string).collect(),
            divergences: self.divergences.clone(),
        }
    }
}
