pub mod replay_file;

pub use replay_file::{RebaseGroup, ReplayConfig, StageGroup, StagedBranch};

use std::path::{Path, PathBuf};

/// File name looked up at the repository root when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "git-replay.yaml";

/// Resolve the configuration path: an explicit path, or the default file at
/// the repository root
pub fn resolve_config_path(repo_root: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => repo_root.join(DEFAULT_CONFIG_FILE),
    }
}
