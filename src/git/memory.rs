//! In-memory backend for exercising the replay engine without a repository.
//!
//! Branches point at synthetic commit ids (`c0`, `c1`, ...). Every mutating
//! command that succeeds moves refs the way git would; conflicts and fatal
//! statuses are scripted per command.

use crate::errors::Result;
use crate::git::backend::{Backend, RerereStatus};
use crate::git::command::{GitCommand, Outcome, FATAL_STATUS};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// A scripted conflict and what the resolution cache made of it.
///
/// A conflict with no paths at all models a step git refused to start
/// (dirty tree, failing hook): the status is non-zero but nothing is stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedConflict {
    pub status: i32,
    /// Paths the cache tracks without a recorded resolution
    pub tracked: Vec<String>,
    /// Paths left unmerged in the index
    pub unmerged: Vec<String>,
    /// Paths the cache could not resolve
    pub remaining: Vec<String>,
    /// Paths the cache resolved from a recorded resolution
    pub resolved: Vec<String>,
}

impl ScriptedConflict {
    /// The cache resolved and staged every path; nothing is left to see but
    /// the stopped step
    pub fn resolved_by_cache(paths: &[&str]) -> Self {
        Self {
            status: 1,
            tracked: Vec::new(),
            unmerged: Vec::new(),
            remaining: Vec::new(),
            resolved: to_strings(paths),
        }
    }

    /// The cache resolved every path but left them unstaged
    pub fn resolved_unstaged(paths: &[&str]) -> Self {
        Self {
            status: 1,
            tracked: Vec::new(),
            unmerged: to_strings(paths),
            remaining: Vec::new(),
            resolved: to_strings(paths),
        }
    }

    /// The cache could not resolve `paths`
    pub fn unresolved(paths: &[&str]) -> Self {
        Self {
            status: 1,
            tracked: to_strings(paths),
            unmerged: to_strings(paths),
            remaining: to_strings(paths),
            resolved: Vec::new(),
        }
    }

    /// A non-zero status with nothing conflicted (dirty tree, hook failure)
    pub fn without_paths() -> Self {
        Self {
            status: 1,
            tracked: Vec::new(),
            unmerged: Vec::new(),
            remaining: Vec::new(),
            resolved: Vec::new(),
        }
    }

    fn stops(&self) -> bool {
        !(self.tracked.is_empty()
            && self.unmerged.is_empty()
            && self.remaining.is_empty()
            && self.resolved.is_empty())
    }
}

/// Scripted result of the next execution of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    Conflict(ScriptedConflict),
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InProgress {
    Rebase { branch: String },
    Merge { commit: String },
}

fn to_strings(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

/// In-memory repository model implementing [`Backend`]
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    branches: BTreeMap<String, String>,
    upstreams: HashMap<String, String>,
    commits: HashSet<String>,
    next_commit: usize,
    head: String,
    previous: Option<String>,
    rerere_enabled: bool,
    tracked: Vec<String>,
    unmerged: Vec<String>,
    remaining: Vec<String>,
    in_progress: Option<InProgress>,
    scripts: HashMap<GitCommand, VecDeque<Script>>,
    executed: Vec<GitCommand>,
}

impl MemoryBackend {
    /// A repository with a single branch checked out
    pub fn new(initial_branch: &str) -> Self {
        let mut backend = Self {
            branches: BTreeMap::new(),
            upstreams: HashMap::new(),
            commits: HashSet::new(),
            next_commit: 0,
            head: initial_branch.to_string(),
            previous: None,
            rerere_enabled: true,
            tracked: Vec::new(),
            unmerged: Vec::new(),
            remaining: Vec::new(),
            in_progress: None,
            scripts: HashMap::new(),
            executed: Vec::new(),
        };
        let root = backend.new_commit();
        backend.branches.insert(initial_branch.to_string(), root);
        backend
    }

    /// Add a branch with a commit of its own
    pub fn with_branch(mut self, name: &str) -> Self {
        let commit = self.new_commit();
        self.branches.insert(name.to_string(), commit);
        self
    }

    /// Configure `upstream` as the upstream of `branch`
    pub fn with_upstream(mut self, branch: &str, upstream: &str) -> Self {
        self.upstreams
            .insert(branch.to_string(), upstream.to_string());
        self
    }

    pub fn with_rerere(mut self, enabled: bool) -> Self {
        self.rerere_enabled = enabled;
        self
    }

    /// Queue a scripted result for the next execution of `command`
    pub fn with_script(mut self, command: GitCommand, script: Script) -> Self {
        self.script(command, script);
        self
    }

    pub fn script(&mut self, command: GitCommand, script: Script) {
        self.scripts.entry(command).or_default().push_back(script);
    }

    /// Commands that actually ran, in order
    pub fn executed(&self) -> &[GitCommand] {
        &self.executed
    }

    /// Currently checked out branch
    pub fn head(&self) -> &str {
        &self.head
    }

    /// Commit `branch` points at
    pub fn tip(&self, branch: &str) -> Option<&str> {
        self.branches.get(branch).map(String::as_str)
    }

    pub fn branch_names(&self) -> Vec<String> {
        self.branches.keys().cloned().collect()
    }

    /// Move `branch` to a fresh commit, as if someone committed on it
    pub fn advance(&mut self, branch: &str) {
        let commit = self.new_commit();
        self.branches.insert(branch.to_string(), commit);
    }

    fn new_commit(&mut self) -> String {
        let id = format!("c{}", self.next_commit);
        self.next_commit += 1;
        self.commits.insert(id.clone());
        id
    }

    fn resolve(&self, reference: &str) -> Option<String> {
        let reference = match (reference, &self.in_progress) {
            ("HEAD", _) => self.head.as_str(),
            ("MERGE_HEAD", Some(InProgress::Merge { commit })) => return Some(commit.clone()),
            ("REBASE_HEAD", Some(InProgress::Rebase { branch })) => branch.as_str(),
            _ => reference,
        };
        if let Some(commit) = self.branches.get(reference) {
            return Some(commit.clone());
        }
        self.commits.contains(reference).then(|| reference.to_string())
    }

    fn checkout(&mut self, branch: &str) {
        if self.head != branch {
            self.previous = Some(std::mem::replace(&mut self.head, branch.to_string()));
        }
    }

    fn clear_conflict(&mut self) {
        self.tracked.clear();
        self.unmerged.clear();
        self.remaining.clear();
        self.in_progress = None;
    }

    fn next_script(&mut self, command: &GitCommand) -> Option<Script> {
        self.scripts
            .get_mut(command)
            .and_then(|queue| queue.pop_front())
    }

    fn enter_conflict(&mut self, conflict: ScriptedConflict, operation: InProgress) -> Outcome {
        if !conflict.stops() {
            return Outcome::Conflict {
                status: conflict.status,
            };
        }
        self.tracked = conflict.tracked;
        self.unmerged = conflict.unmerged;
        self.remaining = conflict.remaining;
        self.in_progress = Some(operation);
        Outcome::Conflict {
            status: conflict.status,
        }
    }

    fn apply(&mut self, command: &GitCommand) -> Outcome {
        let fatal = Outcome::Fatal {
            status: FATAL_STATUS,
        };
        let script = self.next_script(command);
        if script == Some(Script::Fatal) {
            return fatal;
        }
        let conflict = match script {
            Some(Script::Conflict(conflict)) => Some(conflict),
            _ => None,
        };

        match command {
            GitCommand::ForceBranch { branch, target } => {
                let Some(commit) = self.resolve(target) else {
                    return fatal;
                };
                self.branches.insert(branch.clone(), commit);
                Outcome::Success
            }
            GitCommand::DeleteBranches(branches) => {
                if branches
                    .iter()
                    .any(|b| !self.branches.contains_key(b) || *b == self.head)
                {
                    return fatal;
                }
                for branch in branches {
                    self.branches.remove(branch);
                }
                Outcome::Success
            }
            GitCommand::SwitchCreate {
                branch,
                start_point,
            } => {
                if self.in_progress.is_some() {
                    return fatal;
                }
                let Some(commit) = self.resolve(start_point) else {
                    return fatal;
                };
                self.branches.insert(branch.clone(), commit);
                self.checkout(branch);
                Outcome::Success
            }
            GitCommand::SwitchBack => {
                let Some(previous) = self.previous.clone() else {
                    return fatal;
                };
                if self.in_progress.is_some() || !self.branches.contains_key(&previous) {
                    return fatal;
                }
                self.checkout(&previous);
                Outcome::Success
            }
            GitCommand::Rebase { upstream, branch } => {
                if self.in_progress.is_some()
                    || self.resolve(upstream).is_none()
                    || !self.branches.contains_key(branch)
                {
                    return fatal;
                }
                self.checkout(branch);
                if let Some(conflict) = conflict {
                    let operation = InProgress::Rebase {
                        branch: branch.clone(),
                    };
                    return self.enter_conflict(conflict, operation);
                }
                self.advance(branch);
                Outcome::Success
            }
            GitCommand::RebaseContinue => {
                let Some(InProgress::Rebase { branch }) = self.in_progress.clone() else {
                    return fatal;
                };
                if !self.unmerged.is_empty() {
                    return Outcome::Conflict { status: 1 };
                }
                // the resolved step is committed before the next one applies
                self.clear_conflict();
                self.advance(&branch);
                match conflict {
                    Some(conflict) => self.enter_conflict(conflict, InProgress::Rebase { branch }),
                    None => Outcome::Success,
                }
            }
            GitCommand::Merge { reference } => {
                if self.in_progress.is_some() {
                    return fatal;
                }
                let Some(commit) = self.resolve(reference) else {
                    return fatal;
                };
                if let Some(conflict) = conflict {
                    return self.enter_conflict(conflict, InProgress::Merge { commit });
                }
                let head = self.head.clone();
                self.advance(&head);
                Outcome::Success
            }
            GitCommand::Add(paths) => {
                self.unmerged.retain(|p| !paths.contains(p));
                Outcome::Success
            }
            GitCommand::Commit => {
                if !matches!(self.in_progress, Some(InProgress::Merge { .. }))
                    || !self.unmerged.is_empty()
                {
                    return Outcome::Conflict { status: 1 };
                }
                self.clear_conflict();
                let head = self.head.clone();
                self.advance(&head);
                Outcome::Success
            }
        }
    }
}

impl Backend for MemoryBackend {
    fn execute(&mut self, command: &GitCommand) -> Result<Outcome> {
        self.executed.push(command.clone());
        Ok(self.apply(command))
    }

    fn list_branches(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .branches
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn rev_parse(&self, reference: &str) -> Result<Option<String>> {
        Ok(self.resolve(reference))
    }

    fn upstream(&self, branch: &str) -> Result<Option<String>> {
        Ok(self.upstreams.get(branch).cloned())
    }

    fn unmerged_paths(&self) -> Result<Vec<String>> {
        Ok(self.unmerged.clone())
    }

    fn rerere_status(&self) -> Result<RerereStatus> {
        if !self.rerere_enabled {
            return Ok(RerereStatus::default());
        }
        Ok(RerereStatus {
            enabled: true,
            tracked: self.tracked.clone(),
            remaining: self.remaining.clone(),
        })
    }
}
