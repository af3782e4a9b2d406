use crate::config::{ReplayConfig, StagedBranch};
use crate::errors::{ReplayError, Result};
use crate::git::{Backend, GitCommand, Outcome};
use crate::replay::{ConflictStep, Replayer};
use tracing::debug;

impl<B: Backend> Replayer<B> {
    /// Build every declared branch from its start point by merging its
    /// references in order, then return to the branch that was checked out.
    pub fn run_stages(&mut self, config: &ReplayConfig) -> Result<()> {
        if config.stage.iter().all(|group| group.branches.is_empty()) {
            debug!("No stages declared");
            return Ok(());
        }

        self.output.section("Staging branches");
        for group in &config.stage {
            for staged in &group.branches {
                self.stage_branch(&group.start_point, staged)?;
            }
        }
        Ok(())
    }

    fn stage_branch(&mut self, start_point: &str, staged: &StagedBranch) -> Result<()> {
        let branch = staged.name.as_str();
        self.output
            .progress(format!("Building '{branch}' from '{start_point}'"));
        self.save_backup(branch)?;

        let create = GitCommand::switch_create(branch, start_point);
        if !self.apply(create)?.is_success() {
            return Err(ReplayError::BranchCreation {
                branch: branch.to_string(),
                start_point: start_point.to_string(),
            });
        }

        for reference in &staged.merges {
            let command = GitCommand::merge(reference);
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
                    let description = format!("merging '{reference}' into '{branch}'");
                    self.resolve_conflict(ConflictStep::Merge, &description)?;
                }
            }
        }

        if !self.options.dry_run {
            self.record_divergence(branch)?;
        }
        self.apply_checked(GitCommand::SwitchBack)?;
        self.output.success(format!(
            "Built '{branch}' with {} merge(s)",
            staged.merges.len()
        ));
        Ok(())
    }
}
