pub mod backend;
pub mod command;
pub mod memory;
pub mod process;

pub use backend::{Backend, RerereStatus};
pub use command::{backup_branch_name, GitCommand, Outcome, BACKUP_PREFIX};
pub use memory::{MemoryBackend, Script, ScriptedConflict};
pub use process::ProcessBackend;

use crate::errors::{ReplayError, Result};
use std::path::{Path, PathBuf};

/// Check if a directory is inside a Git repository
pub fn is_git_repository(path: &Path) -> bool {
    git2::Repository::discover(path).is_ok()
}

/// Find the root of the Git repository containing `start_path`
pub fn find_repository_root(start_path: &Path) -> Result<PathBuf> {
    let repo = git2::Repository::discover(start_path).map_err(|e| {
        ReplayError::not_a_repository(format!("{}: {}", start_path.display(), e.message()))
    })?;

    let workdir = repo.workdir().ok_or_else(|| {
        ReplayError::not_a_repository("Repository has no working directory (bare repo?)")
    })?;

    Ok(workdir.to_path_buf())
}
