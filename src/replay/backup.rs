use crate::config::ReplayConfig;
use crate::errors::Result;
use crate::git::{backup_branch_name, Backend, GitCommand, BACKUP_PREFIX};
use crate::replay::Replayer;
use tracing::debug;

impl<B: Backend> Replayer<B> {
    /// Snapshot `branch` as `git-replay/<branch>` before it is mutated.
    ///
    /// A no-op unless backups were requested. A branch that does not exist
    /// yet has nothing to snapshot.
    pub fn save_backup(&mut self, branch: &str) -> Result<()> {
        if !self.options.back_up {
            return Ok(());
        }
        if self.backend.rev_parse(branch)?.is_none() {
            debug!("'{}' does not exist, skipping backup", branch);
            self.output
                .info(format!("'{branch}' does not exist yet, nothing to back up"));
            return Ok(());
        }

        let backup = backup_branch_name(branch);
        self.apply_checked(GitCommand::force_branch(&backup, branch))?;
        self.output.info(format!("Backed up '{branch}' to '{backup}'"));
        Ok(())
    }

    /// Reset every branch the configuration mentions to its backup, then
    /// delete the whole backup set. Branches without a backup are reported
    /// and skipped.
    pub fn restore_backup(&mut self, config: &ReplayConfig) -> Result<()> {
        self.output.section("Restoring backups");

        for branch in config.branches() {
            let backup = backup_branch_name(&branch);
            if self.backend.rev_parse(&backup)?.is_none() {
                self.output.info(format!("No backup found for '{branch}'"));
                continue;
            }
            self.apply_checked(GitCommand::switch_create(&branch, &backup))?;
            self.output
                .success(format!("Restored '{branch}' from '{backup}'"));
        }

        self.delete_backup()
    }

    /// Delete every `git-replay/` branch
    pub fn delete_backup(&mut self) -> Result<()> {
        let backups = self.backend.list_branches(BACKUP_PREFIX)?;
        if backups.is_empty() {
            self.output.info("No backup found");
            return Ok(());
        }

        let count = backups.len();
        self.apply_checked(GitCommand::DeleteBranches(backups))?;
        self.output
            .success(format!("Deleted {count} backup branch(es)"));
        Ok(())
    }
}
