//! Backend that runs the `git` executable, one process per operation.

use crate::errors::{ReplayError, Result};
use crate::git::backend::{Backend, RerereStatus};
use crate::git::command::{GitCommand, Outcome};
use std::path::PathBuf;
use std::process::{Command, Output};
use tracing::debug;

/// Production backend rooted at a repository's working directory
pub struct ProcessBackend {
    root: PathBuf,
    quiet: bool,
}

impl ProcessBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            quiet: false,
        }
    }

    /// Capture what mutating commands print instead of passing it through;
    /// the captured text goes to the debug log
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()?;
        debug!("git {} -> {:?}", args.join(" "), output.status.code());
        Ok(output)
    }

    /// Run a query that must succeed and return its trimmed stdout
    fn query(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;
        if !output.status.success() {
            return Err(ReplayError::QueryFailed {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn query_lines(&self, args: &[&str]) -> Result<Vec<String>> {
        Ok(lines(&self.query(args)?))
    }
}

fn lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl Backend for ProcessBackend {
    fn execute(&mut self, command: &GitCommand) -> Result<Outcome> {
        let mut git = Command::new("git");
        git.args(command.args()).current_dir(&self.root);
        let status = if self.quiet {
            let output = git.output()?;
            debug!(
                "{} printed stdout {:?}, stderr {:?}",
                command,
                String::from_utf8_lossy(&output.stdout).trim(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            output.status
        } else {
            git.status()?
        };
        let outcome = Outcome::from_status(status.code());
        debug!("{} -> {:?}", command, outcome);
        Ok(outcome)
    }

    fn list_branches(&self, prefix: &str) -> Result<Vec<String>> {
        let pattern = format!("refs/heads/{prefix}");
        let refs = self.query_lines(&["for-each-ref", "--format=%(refname)", &pattern])?;
        Ok(refs
            .into_iter()
            .filter_map(|name| name.strip_prefix("refs/heads/").map(str::to_string))
            .filter(|name| name.starts_with(prefix))
            .collect())
    }

    fn rev_parse(&self, reference: &str) -> Result<Option<String>> {
        let output = self.run(&["rev-parse", "--verify", "--quiet", reference])?;
        if output.status.success() {
            let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
            Ok(Some(id))
        } else {
            Ok(None)
        }
    }

    fn upstream(&self, branch: &str) -> Result<Option<String>> {
        let upstream_ref = format!("{branch}@{{u}}");
        let output = self.run(&[
            "rev-parse",
            "--abbrev-ref",
            "--symbolic-full-name",
            &upstream_ref,
        ])?;
        if !output.status.success() {
            // git exits with 128 when no upstream is configured
            return Ok(None);
        }
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!name.is_empty()).then_some(name))
    }

    fn unmerged_paths(&self) -> Result<Vec<String>> {
        self.query_lines(&["diff", "--name-only", "--diff-filter=U"])
    }

    fn rerere_status(&self) -> Result<RerereStatus> {
        let output = self.run(&["config", "--get", "--bool", "rerere.enabled"])?;
        let enabled =
            output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true";
        if !enabled {
            return Ok(RerereStatus::default());
        }

        Ok(RerereStatus {
            enabled,
            tracked: self.query_lines(&["rerere", "status"])?,
            remaining: self.query_lines(&["rerere", "remaining"])?,
        })
    }
}
