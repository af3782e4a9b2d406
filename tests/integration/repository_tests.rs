//! Replay runs against real throwaway repositories.

use super::test_helpers::*;
use git_replay::config::ReplayConfig;
use git_replay::git::ProcessBackend;
use git_replay::replay::{Replayer, RunMode};
use git_replay::ReplayError;
use std::path::Path;

fn replayer(repo_path: &Path, dry_run: bool, back_up: bool) -> Replayer<ProcessBackend> {
    Replayer::new(ProcessBackend::new(repo_path), options(dry_run, back_up))
}

/// `feature-a` and `feature-b` branched from `main`, which then moved on
fn diverged_repo() -> (tempfile::TempDir, std::path::PathBuf) {
    let (temp_dir, repo_path) = create_test_git_repo();
    create_branch_with_commit(&repo_path, "feature-a", "main", "a.txt", "a\n");
    create_branch_with_commit(&repo_path, "feature-b", "main", "b.txt", "b\n");
    commit_file(&repo_path, "main.txt", "main\n", "Advance main");
    (temp_dir, repo_path)
}

#[test]
fn test_rebases_branches_onto_upstream() {
    let (_temp_dir, repo_path) = diverged_repo();
    assert!(!is_ancestor(&repo_path, "main", "feature-a"));
    let config = ReplayConfig::from_yaml("rebase:\n  main: [feature-a, feature-b]\n").unwrap();

    replayer(&repo_path, false, false)
        .run(RunMode::Replay(&config))
        .unwrap();

    assert!(is_ancestor(&repo_path, "main", "feature-a"));
    assert!(is_ancestor(&repo_path, "main", "feature-b"));
}

#[test]
fn test_stage_builds_branch_and_returns_to_original() {
    let (_temp_dir, repo_path) = create_test_git_repo();
    create_branch_with_commit(&repo_path, "commit-1", "main", "one.txt", "one\n");
    create_branch_with_commit(&repo_path, "commit-2", "main", "two.txt", "two\n");
    let config =
        ReplayConfig::from_yaml("stage:\n  main:\n    release: [commit-1, commit-2]\n").unwrap();

    replayer(&repo_path, false, false)
        .run(RunMode::Replay(&config))
        .unwrap();

    assert_eq!(current_branch(&repo_path), "main");
    assert!(is_ancestor(&repo_path, "commit-1", "release"));
    assert!(is_ancestor(&repo_path, "commit-2", "release"));
    // --no-ff: both merges create a commit with two parents
    let parents = git(&repo_path, &["rev-list", "--parents", "-n", "1", "release"]);
    assert_eq!(parents.split_whitespace().count(), 3);
}

#[test]
fn test_dry_run_leaves_repository_untouched() {
    let (_temp_dir, repo_path) = diverged_repo();
    let before = rev(&repo_path, "feature-a");
    let config = ReplayConfig::from_yaml(
        "rebase:\n  main: [feature-a]\nstage:\n  main:\n    release: [feature-b]\n",
    )
    .unwrap();

    let report = replayer(&repo_path, true, true)
        .run(RunMode::Replay(&config))
        .unwrap();

    assert_eq!(report.commands.len(), 5);
    assert_eq!(rev(&repo_path, "feature-a"), before);
    assert!(git_output(&repo_path, &["rev-parse", "--verify", "--quiet", "release"])
        .stdout
        .is_empty());
    assert!(backup_branches(&repo_path).is_empty());
}

#[test]
fn test_backup_and_restore_round_trip() {
    let (_temp_dir, repo_path) = diverged_repo();
    let before_a = rev(&repo_path, "feature-a");
    let before_b = rev(&repo_path, "feature-b");
    let config = ReplayConfig::from_yaml("rebase:\n  main: [feature-a, feature-b]\n").unwrap();

    replayer(&repo_path, false, true)
        .run(RunMode::Replay(&config))
        .unwrap();
    assert_ne!(rev(&repo_path, "feature-a"), before_a);
    assert_eq!(
        backup_branches(&repo_path),
        vec!["git-replay/feature-a", "git-replay/feature-b"]
    );

    replayer(&repo_path, false, false)
        .run(RunMode::Restore(&config))
        .unwrap();

    assert_eq!(rev(&repo_path, "feature-a"), before_a);
    assert_eq!(rev(&repo_path, "feature-b"), before_b);
    assert!(backup_branches(&repo_path).is_empty());
}

#[test]
fn test_clean_deletes_backup_branches() {
    let (_temp_dir, repo_path) = create_test_git_repo();
    git(&repo_path, &["branch", "git-replay/one"]);
    git(&repo_path, &["branch", "git-replay/two"]);
    git(&repo_path, &["branch", "keep-me"]);

    replayer(&repo_path, false, false)
        .run(RunMode::Clean)
        .unwrap();

    assert!(backup_branches(&repo_path).is_empty());
    assert_eq!(rev(&repo_path, "keep-me"), rev(&repo_path, "main"));
}

#[test]
fn test_unresolved_conflict_without_recorded_resolution() {
    let (_temp_dir, repo_path) = create_test_git_repo();
    git(&repo_path, &["config", "rerere.enabled", "true"]);
    create_branch_with_commit(&repo_path, "topic-1", "main", "shared.txt", "one\n");
    create_branch_with_commit(&repo_path, "topic-2", "main", "shared.txt", "two\n");
    let config =
        ReplayConfig::from_yaml("stage:\n  main:\n    release: [topic-1, topic-2]\n").unwrap();

    let err = replayer(&repo_path, false, false)
        .run(RunMode::Replay(&config))
        .unwrap_err();

    match err {
        ReplayError::UnresolvedConflict { paths, .. } => {
            assert_eq!(paths, vec!["shared.txt".to_string()])
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(current_branch(&repo_path), "release");
}

#[test]
fn test_recorded_resolution_is_replayed() {
    let (_temp_dir, repo_path) = create_test_git_repo();
    git(&repo_path, &["config", "rerere.enabled", "true"]);
    create_branch_with_commit(&repo_path, "topic-1", "main", "shared.txt", "one\n");
    create_branch_with_commit(&repo_path, "topic-2", "main", "shared.txt", "two\n");

    // Record a resolution for the topic-1/topic-2 conflict once by hand
    git(&repo_path, &["switch", "--quiet", "--create", "scratch", "topic-1"]);
    assert!(!git_output(&repo_path, &["merge", "--no-edit", "topic-2"])
        .status
        .success());
    std::fs::write(repo_path.join("shared.txt"), "one and two\n").unwrap();
    git(&repo_path, &["add", "shared.txt"]);
    git(&repo_path, &["commit", "--quiet", "--no-edit"]);
    git(&repo_path, &["switch", "--quiet", "main"]);
    git(&repo_path, &["branch", "--delete", "--force", "scratch"]);

    let config =
        ReplayConfig::from_yaml("stage:\n  main:\n    release: [topic-1, topic-2]\n").unwrap();
    replayer(&repo_path, false, false)
        .run(RunMode::Replay(&config))
        .unwrap();

    assert_eq!(current_branch(&repo_path), "main");
    assert_eq!(
        git(&repo_path, &["show", "release:shared.txt"]),
        "one and two"
    );
}

#[test]
fn test_recorded_resolution_is_replayed_during_rebase() {
    let (_temp_dir, repo_path) = create_test_git_repo();
    git(&repo_path, &["config", "rerere.enabled", "true"]);
    commit_file(&repo_path, "shared.txt", "base\n", "Add shared file");
    create_branch_with_commit(&repo_path, "feature", "main", "shared.txt", "feature\n");
    commit_file(&repo_path, "shared.txt", "main\n", "Change shared file on main");

    // Record a resolution for rebasing feature onto main once by hand
    git(&repo_path, &["switch", "--quiet", "--create", "scratch", "feature"]);
    assert!(!git_output(&repo_path, &["rebase", "--quiet", "main"])
        .status
        .success());
    std::fs::write(repo_path.join("shared.txt"), "merged\n").unwrap();
    git(&repo_path, &["add", "shared.txt"]);
    git(&repo_path, &["-c", "core.editor=true", "rebase", "--continue"]);
    git(&repo_path, &["switch", "--quiet", "main"]);
    git(&repo_path, &["branch", "--delete", "--force", "scratch"]);

    let config = ReplayConfig::from_yaml("rebase:\n  main: [feature]\n").unwrap();
    let report = replayer(&repo_path, false, false)
        .run(RunMode::Replay(&config))
        .unwrap();

    assert_eq!(
        report.commands,
        vec![
            "git rebase --rerere-autoupdate --quiet main feature",
            "git -c core.editor=true rebase --continue",
        ]
    );
    assert!(is_ancestor(&repo_path, "main", "feature"));
    assert_eq!(git(&repo_path, &["show", "feature:shared.txt"]), "merged");
    assert_eq!(git(&repo_path, &["status", "--porcelain"]), "");
}

#[test]
fn test_fatal_status_for_unknown_upstream() {
    let (_temp_dir, repo_path) = diverged_repo();
    let config =
        ReplayConfig::from_yaml("rebase:\n  no-such-branch: [feature-a, feature-b]\n").unwrap();
    let before_b = rev(&repo_path, "feature-b");

    let err = replayer(&repo_path, false, false)
        .run(RunMode::Replay(&config))
        .unwrap_err();

    assert!(matches!(err, ReplayError::Backend { .. }));
    assert_eq!(rev(&repo_path, "feature-b"), before_b);
}
