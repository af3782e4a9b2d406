use crate::errors::{ReplayError, Result};
use crate::git::{Backend, GitCommand, Outcome};
use crate::replay::Replayer;
use tracing::debug;

/// The kind of step that stopped on a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictStep {
    /// A rebase stopped; finalized with `rebase --continue`
    Rebase,
    /// A merge stopped; finalized with `commit --no-edit`
    Merge,
}

impl ConflictStep {
    /// Ref that exists only while a step of this kind is stopped
    fn stopped_ref(self) -> &'static str {
        match self {
            ConflictStep::Rebase => "REBASE_HEAD",
            ConflictStep::Merge => "MERGE_HEAD",
        }
    }

    fn finalize_command(self) -> GitCommand {
        match self {
            ConflictStep::Rebase => GitCommand::RebaseContinue,
            ConflictStep::Merge => GitCommand::Commit,
        }
    }
}

/// Union of unmerged paths and paths the cache tracks, in first-seen order
fn conflicted_paths(unmerged: &[String], tracked: &[String]) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    for path in unmerged.iter().chain(tracked) {
        if !paths.contains(path) {
            paths.push(path.clone());
        }
    }
    paths
}

impl<B: Backend> Replayer<B> {
    /// Finalize a conflicted step when the resolution cache resolved every
    /// conflicted path; any other state is an unresolved conflict.
    ///
    /// Paths the cache resolved and staged leave no trace in the index or the
    /// cache, so a step stopped with nothing unmerged still counts as
    /// conflicted. A non-zero status with no stopped step and no conflicted
    /// path (dirty tree, failing hook) is never finalized.
    ///
    /// A rebase may stop again on a later commit after `--continue`; each
    /// stop is resolved by the same rule as long as the rebase moves forward.
    pub fn resolve_conflict(&mut self, step: ConflictStep, description: &str) -> Result<()> {
        loop {
            let unmerged = self.backend.unmerged_paths()?;
            let rerere = self.backend.rerere_status()?;
            let conflicted = conflicted_paths(&unmerged, &rerere.tracked);
            let stopped = self.backend.rev_parse(step.stopped_ref())?.is_some();
            debug!(
                "conflict while {}: stopped={} unmerged={:?} tracked={:?} remaining={:?} enabled={}",
                description, stopped, unmerged, rerere.tracked, rerere.remaining, rerere.enabled
            );

            if !rerere.enabled {
                self.output
                    .warning("rerere is not enabled, conflicts cannot be resolved automatically");
                return Err(ReplayError::unresolved(description, conflicted));
            }
            if !stopped && conflicted.is_empty() {
                return Err(ReplayError::unresolved(description, conflicted));
            }
            if !rerere.remaining.is_empty() {
                return Err(ReplayError::unresolved(description, rerere.remaining));
            }

            if conflicted.is_empty() {
                self.output.info("Recorded resolution applied");
            } else {
                self.output.info(format!(
                    "Recorded resolution applied to {}",
                    conflicted.join(", ")
                ));
            }
            if !unmerged.is_empty() {
                self.apply_checked(GitCommand::Add(unmerged))?;
            }

            let head_before = self.backend.rev_parse("HEAD")?;
            let finalize = step.finalize_command();
            let line = finalize.to_string();
            match self.apply(finalize)? {
                Outcome::Success => return Ok(()),
                Outcome::Fatal { status } => {
                    return Err(ReplayError::Backend {
                        command: line,
                        status,
                    })
                }
                Outcome::Conflict { status } => {
                    let head_after = self.backend.rev_parse("HEAD")?;
                    if step == ConflictStep::Merge || head_after == head_before {
                        debug!("`{}` exited with {} without progress", line, status);
                        return Err(ReplayError::unresolved(description, conflicted));
                    }
                    debug!("rebase stopped again while {}", description);
                }
            }
        }
    }
}
