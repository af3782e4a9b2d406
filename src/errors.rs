use std::path::PathBuf;

/// Replay Error Types
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// The working directory is not inside a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(String),

    /// The configuration file does not exist
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend reported a fatal status
    #[error("Backend error: `{command}` exited with status {status}")]
    Backend { command: String, status: i32 },

    /// A read-only query failed
    #[error("Query failed: `{command}`: {stderr}")]
    QueryFailed { command: String, stderr: String },

    /// A conflict the resolution cache could not resolve
    #[error("Unresolved conflict while {step}{}", format_paths(.paths))]
    UnresolvedConflict { step: String, paths: Vec<String> },

    /// A stage branch could not be created from its start point
    #[error("Could not create branch '{branch}' from '{start_point}'")]
    BranchCreation { branch: String, start_point: String },
}

fn format_paths(paths: &[String]) -> String {
    if paths.is_empty() {
        String::new()
    } else {
        format!(": {}", paths.join(", "))
    }
}

impl ReplayError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ReplayError::Config(msg.into())
    }

    pub fn not_a_repository<S: Into<String>>(msg: S) -> Self {
        ReplayError::NotARepository(msg.into())
    }

    pub fn unresolved<S: Into<String>>(step: S, paths: Vec<String>) -> Self {
        ReplayError::UnresolvedConflict {
            step: step.into(),
            paths,
        }
    }

    /// Errors raised while validating the environment, before any mutation
    pub fn is_environment(&self) -> bool {
        matches!(
            self,
            ReplayError::NotARepository(_)
                | ReplayError::ConfigNotFound(_)
                | ReplayError::Config(_)
                | ReplayError::Yaml(_)
                | ReplayError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReplayError>;
