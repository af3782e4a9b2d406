use std::fmt;

/// Prefix reserved for backup branches
pub const BACKUP_PREFIX: &str = "git-replay/";

/// Name of the backup branch for `branch`
pub fn backup_branch_name(branch: &str) -> String {
    format!("{BACKUP_PREFIX}{branch}")
}

/// A mutating backend command.
///
/// This is the closed set of commands that change refs or the working tree.
/// Every one of them is announced before it runs and is skipped in dry-run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GitCommand {
    /// Create or move `branch` to `target`
    ForceBranch { branch: String, target: String },
    /// Delete branches regardless of merge state
    DeleteBranches(Vec<String>),
    /// Switch to `branch`, (re)creating it at `start_point`
    SwitchCreate { branch: String, start_point: String },
    /// Switch back to the previously checked out branch
    SwitchBack,
    /// Rebase `branch` onto `upstream`
    Rebase { upstream: String, branch: String },
    /// Continue a stopped rebase without opening an editor
    RebaseContinue,
    /// Merge `reference` into the current branch
    Merge { reference: String },
    /// Stage paths
    Add(Vec<String>),
    /// Conclude the current merge
    Commit,
}

impl GitCommand {
    pub fn force_branch(branch: impl Into<String>, target: impl Into<String>) -> Self {
        GitCommand::ForceBranch {
            branch: branch.into(),
            target: target.into(),
        }
    }

    pub fn switch_create(branch: impl Into<String>, start_point: impl Into<String>) -> Self {
        GitCommand::SwitchCreate {
            branch: branch.into(),
            start_point: start_point.into(),
        }
    }

    pub fn rebase(upstream: impl Into<String>, branch: impl Into<String>) -> Self {
        GitCommand::Rebase {
            upstream: upstream.into(),
            branch: branch.into(),
        }
    }

    pub fn merge(reference: impl Into<String>) -> Self {
        GitCommand::Merge {
            reference: reference.into(),
        }
    }

    /// Arguments passed to the `git` executable
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        match self {
            GitCommand::ForceBranch { branch, target } => {
                args.extend(["branch", "--force"].map(String::from));
                args.push(branch.clone());
                args.push(target.clone());
            }
            GitCommand::DeleteBranches(branches) => {
                args.extend(["branch", "--delete", "--force"].map(String::from));
                args.extend(branches.iter().cloned());
            }
            GitCommand::SwitchCreate {
                branch,
                start_point,
            } => {
                args.extend(["switch", "--force-create"].map(String::from));
                args.push(branch.clone());
                args.push(start_point.clone());
            }
            GitCommand::SwitchBack => {
                args.extend(["switch", "-"].map(String::from));
            }
            GitCommand::Rebase { upstream, branch } => {
                args.extend(["rebase", "--rerere-autoupdate", "--quiet"].map(String::from));
                args.push(upstream.clone());
                args.push(branch.clone());
            }
            GitCommand::RebaseContinue => {
                args.extend(["-c", "core.editor=true", "rebase", "--continue"].map(String::from));
            }
            GitCommand::Merge { reference } => {
                args.extend(
                    [
                        "merge",
                        "--no-ff",
                        "--no-edit",
                        "--rerere-autoupdate",
                        "--quiet",
                    ]
                    .map(String::from),
                );
                args.push(reference.clone());
            }
            GitCommand::Add(paths) => {
                args.extend(["add", "--"].map(String::from));
                args.extend(paths.iter().cloned());
            }
            GitCommand::Commit => {
                args.extend(["commit", "--no-edit", "--quiet"].map(String::from));
            }
        }
        args
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git {}", self.args().join(" "))
    }
}

/// Status of a backend command, classified once at the backend boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Non-zero status other than 128: a conflict subject to resolution
    Conflict { status: i32 },
    /// Status 128 (or abnormal termination): detached state, invalid ref, ...
    Fatal { status: i32 },
}

/// Status git uses for fatal errors
pub const FATAL_STATUS: i32 = 128;

impl Outcome {
    /// Classify a process exit code; `None` means the process was killed
    pub fn from_status(code: Option<i32>) -> Self {
        match code {
            Some(0) => Outcome::Success,
            Some(FATAL_STATUS) => Outcome::Fatal {
                status: FATAL_STATUS,
            },
            Some(status) => Outcome::Conflict { status },
            None => Outcome::Fatal { status: -1 },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn status(&self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Conflict { status } | Outcome::Fatal { status } => *status,
        }
    }
}
