//! The replay engine: ordered execution of declared rebases and stages.
//!
//! A [`Replayer`] owns a [`Backend`] and an immutable [`ReplayOptions`]. Every
//! mutating command goes through [`Replayer::apply`], which announces it and
//! skips it in dry-run. The components live in their own modules:
//!
//! - `backup`: snapshot, restore and delete `git-replay/<branch>` branches
//! - `conflict`: finalize conflicts the resolution cache fully resolved
//! - `rebase`: the `rebase` section
//! - `stage`: the `stage` section
//! - `orchestrator`: mode dispatch and environment validation

pub mod backup;
pub mod conflict;
pub mod orchestrator;
pub mod rebase;
pub mod stage;

pub use conflict::ConflictStep;
pub use orchestrator::{RunMode, RunReport, Workspace};

use crate::cli::output::{Output, Verbosity};
use crate::errors::{ReplayError, Result};
use crate::git::{Backend, GitCommand, Outcome};
use tracing::debug;

/// Run configuration, fixed for the lifetime of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Announce mutating commands without running them
    pub dry_run: bool,
    /// Snapshot each branch before it is mutated
    pub back_up: bool,
    pub verbosity: Verbosity,
}

impl ReplayOptions {
    pub fn output(&self) -> Output {
        Output::new(self.verbosity, self.dry_run)
    }
}

/// Executes replay operations against a backend
pub struct Replayer<B: Backend> {
    backend: B,
    options: ReplayOptions,
    output: Output,
    transcript: Vec<GitCommand>,
    divergences: Vec<String>,
}

impl<B: Backend> Replayer<B> {
    pub fn new(backend: B, options: ReplayOptions) -> Self {
        Self {
            backend,
            options,
            output: options.output(),
            transcript: Vec::new(),
            divergences: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Every mutating command announced so far, executed or simulated
    pub fn transcript(&self) -> &[GitCommand] {
        &self.transcript
    }

    /// Divergence notices recorded so far
    pub fn divergences(&self) -> &[String] {
        &self.divergences
    }

    /// Announce a mutating command and run it unless this is a dry run
    pub fn apply(&mut self, command: GitCommand) -> Result<Outcome> {
        self.output.command(&command);
        let outcome = if self.options.dry_run {
            Outcome::Success
        } else {
            self.backend.execute(&command)?
        };
        self.transcript.push(command);
        Ok(outcome)
    }

    /// Like [`Replayer::apply`], treating any non-zero status as an error
    pub(crate) fn apply_checked(&mut self, command: GitCommand) -> Result<()> {
        let line = command.to_string();
        match self.apply(command)? {
            Outcome::Success => Ok(()),
            outcome => Err(ReplayError::Backend {
                command: line,
                status: outcome.status(),
            }),
        }
    }

    /// Record a notice when `branch` has an upstream whose tip differs from
    /// its own
    pub(crate) fn record_divergence(&mut self, branch: &str) -> Result<()> {
        let Some(upstream) = self.backend.upstream(branch)? else {
            debug!("'{}' has no upstream", branch);
            return Ok(());
        };
        let upstream_tip = self.backend.rev_parse(&upstream)?;
        let tip = self.backend.rev_parse(branch)?;
        debug!("'{}' at {:?}, upstream '{}' at {:?}", branch, tip, upstream, upstream_tip);

        if let (Some(upstream_tip), Some(tip)) = (upstream_tip, tip) {
            if upstream_tip != tip {
                let notice = format!("'{branch}' differs from its upstream '{upstream}'");
                self.output.info(&notice);
                self.divergences.push(notice);
            }
        }
        Ok(())
    }
}
