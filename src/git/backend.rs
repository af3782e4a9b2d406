use crate::errors::Result;
use crate::git::command::{GitCommand, Outcome};

/// State of the backend's resolution cache (rerere) for the current conflict
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RerereStatus {
    /// Whether `rerere.enabled` is set
    pub enabled: bool,
    /// Paths the cache tracks without a recorded resolution
    pub tracked: Vec<String>,
    /// Paths the cache could not resolve
    pub remaining: Vec<String>,
}

/// The version-control capabilities the replay engine is built on.
///
/// Mutating operations go through [`Backend::execute`]; announcing them and
/// honoring dry-run is the caller's job, so implementations only run them.
pub trait Backend {
    /// Run a mutating command and classify its status
    fn execute(&mut self, command: &GitCommand) -> Result<Outcome>;

    /// Short names of local branches under `prefix`
    fn list_branches(&self, prefix: &str) -> Result<Vec<String>>;

    /// Commit id `reference` points at, `None` if it does not resolve
    fn rev_parse(&self, reference: &str) -> Result<Option<String>>;

    /// Upstream configured for `branch`, `None` if there is none
    fn upstream(&self, branch: &str) -> Result<Option<String>>;

    /// Paths currently in an unmerged state
    fn unmerged_paths(&self) -> Result<Vec<String>>;

    /// Resolution cache state
    fn rerere_status(&self) -> Result<RerereStatus>;
}
