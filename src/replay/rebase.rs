use crate::config::ReplayConfig;
use crate::errors::{ReplayError, Result};
use crate::git::{Backend, GitCommand, Outcome};
use crate::replay::{ConflictStep, Replayer};
use tracing::debug;

impl<B: Backend> Replayer<B> {
    /// Rebase every declared branch onto its upstream, in declared order.
    ///
    /// Stops at the first fatal status or unresolved conflict; branches
    /// rebased before that stay rebased.
    pub fn run_rebases(&mut self, config: &ReplayConfig) -> Result<()> {
        if config.rebase.iter().all(|group| group.branches.is_empty()) {
            debug!("No rebases declared");
            return Ok(());
        }

        self.output.section("Rebasing branches");
        for group in &config.rebase {
            for branch in &group.branches {
                self.rebase_branch(&group.upstream, branch)?;
            }
        }
        Ok(())
    }

    fn rebase_branch(&mut self, upstream: &str, branch: &str) -> Result<()> {
        self.output
            .progress(format!("Rebasing '{branch}' onto '{upstream}'"));
        self.save_backup(branch)?;

        let command = GitCommand::rebase(upstream, branch);
        let line = command.to_string();
        match self.apply(command)? {
            Outcome::Success => {}
            Outcome::Fatal { status } => {
                return Err(ReplayError::Backend {
                    command: line,
                    status,
                })
            }
            Outcome::Conflict { status } => {
                debug!("`{}` exited with {}", line, status);
                let description = format!("rebasing '{branch}' onto '{upstream}'");
                self.resolve_conflict(ConflictStep::Rebase, &description)?;
            }
        }

        if !self.options.dry_run {
            self.record_divergence(branch)?;
        }
        self.output
            .success(format!("Rebased '{branch}' onto '{upstream}'"));
        Ok(())
    }
}
