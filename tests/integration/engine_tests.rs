//! Replay scenarios against the in-memory backend.

use super::test_helpers::options;
use git_replay::config::ReplayConfig;
use git_replay::git::{GitCommand, MemoryBackend, Script, ScriptedConflict};
use git_replay::replay::{Replayer, RunMode};
use git_replay::ReplayError;

fn repository() -> MemoryBackend {
    MemoryBackend::new("main")
        .with_branch("feature-a")
        .with_branch("feature-b")
        .with_branch("commit-1")
        .with_branch("commit-2")
}

fn full_config() -> ReplayConfig {
    ReplayConfig::from_yaml(
        r#"
rebase:
  main:
    - feature-a
    - feature-b
stage:
  main:
    release:
      - commit-1
      - commit-2
"#,
    )
    .unwrap()
}

#[test]
fn test_clean_rebase_of_two_branches() {
    let config = ReplayConfig::from_yaml("rebase:\n  main: [feature-a, feature-b]\n").unwrap();
    let mut replayer = Replayer::new(repository(), options(false, false));

    let report = replayer.run(RunMode::Replay(&config)).unwrap();

    assert_eq!(
        replayer.backend().executed(),
        &[
            GitCommand::rebase("main", "feature-a"),
            GitCommand::rebase("main", "feature-b"),
        ]
    );
    let resolved = replayer.backend().executed().iter().any(|c| {
        matches!(
            c,
            GitCommand::Add(_) | GitCommand::Commit | GitCommand::RebaseContinue
        )
    });
    assert!(!resolved);
    assert!(report.divergences.is_empty());
}

#[test]
fn test_stage_merges_in_order_and_restores_current_branch() {
    let config =
        ReplayConfig::from_yaml("stage:\n  main:\n    release: [commit-1, commit-2]\n").unwrap();
    let mut replayer = Replayer::new(repository(), options(false, false));

    replayer.run(RunMode::Replay(&config)).unwrap();

    let backend = replayer.backend();
    assert_eq!(
        backend.executed(),
        &[
            GitCommand::switch_create("release", "main"),
            GitCommand::merge("commit-1"),
            GitCommand::merge("commit-2"),
            GitCommand::SwitchBack,
        ]
    );
    assert_eq!(backend.head(), "main");
    assert!(backend.tip("release").is_some());
}

#[test]
fn test_rebase_conflict_resolved_by_cache_continues_to_next_branch() {
    let backend = repository().with_script(
        GitCommand::rebase("main", "feature-a"),
        Script::Conflict(ScriptedConflict::resolved_unstaged(&["src/lib.rs"])),
    );
    let config = ReplayConfig::from_yaml("rebase:\n  main: [feature-a, feature-b]\n").unwrap();
    let mut replayer = Replayer::new(backend, options(false, false));

    replayer.run(RunMode::Replay(&config)).unwrap();

    assert_eq!(
        replayer.backend().executed(),
        &[
            GitCommand::rebase("main", "feature-a"),
            GitCommand::Add(vec!["src/lib.rs".to_string()]),
            GitCommand::RebaseContinue,
            GitCommand::rebase("main", "feature-b"),
        ]
    );
}

#[test]
fn test_unresolved_merge_aborts_and_keeps_earlier_work() {
    let backend = repository().with_script(
        GitCommand::merge("commit-2"),
        Script::Conflict(ScriptedConflict::unresolved(&["CHANGELOG.md"])),
    );
    let mut replayer = Replayer::new(backend, options(false, false));
    let before = replayer.backend().tip("feature-a").unwrap().to_string();

    let err = replayer.run(RunMode::Replay(&full_config())).unwrap_err();

    match err {
        ReplayError::UnresolvedConflict { step, paths } => {
            assert_eq!(step, "merging 'commit-2' into 'release'");
            assert_eq!(paths, vec!["CHANGELOG.md".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    let backend = replayer.backend();
    assert_ne!(backend.tip("feature-a"), Some(before.as_str()));
    assert_eq!(backend.executed().last(), Some(&GitCommand::merge("commit-2")));
}

#[test]
fn test_fatal_merge_status_aborts_run() {
    let backend = repository().with_script(GitCommand::merge("commit-1"), Script::Fatal);
    let mut replayer = Replayer::new(backend, options(false, false));

    let err = replayer.run(RunMode::Replay(&full_config())).unwrap_err();

    assert!(matches!(err, ReplayError::Backend { status: 128, .. }));
    assert_eq!(
        replayer.backend().executed().last(),
        Some(&GitCommand::merge("commit-1"))
    );
}

#[test]
fn test_empty_sections_issue_no_mutation() {
    for yaml in ["", "rebase:\n", "stage:\n", "rebase: {}\nstage: {}\n"] {
        let config = ReplayConfig::from_yaml(yaml).unwrap();
        let mut replayer = Replayer::new(repository(), options(false, true));

        let report = replayer.run(RunMode::Replay(&config)).unwrap();

        assert!(report.commands.is_empty(), "config {yaml:?}");
        assert!(replayer.backend().executed().is_empty(), "config {yaml:?}");
    }
}

#[test]
fn test_dry_run_issues_identical_transcript_without_mutation() {
    let backend = repository()
        .with_upstream("feature-a", "main")
        .with_upstream("release", "main");
    let mut real = Replayer::new(backend.clone(), options(false, true));
    let mut simulated = Replayer::new(backend, options(true, true));

    let real_report = real.run(RunMode::Replay(&full_config())).unwrap();
    let simulated_report = simulated.run(RunMode::Replay(&full_config())).unwrap();

    assert_eq!(real_report.commands, simulated_report.commands);
    assert!(simulated.backend().executed().is_empty());
    assert!(simulated_report.divergences.is_empty());
    assert_eq!(real_report.divergences.len(), 2);
}

#[test]
fn test_restore_is_left_inverse_of_backed_up_run() {
    let mut replayer = Replayer::new(repository(), options(false, true));
    let before: Vec<(String, Option<String>)> = ["feature-a", "feature-b", "release"]
        .iter()
        .map(|b| (b.to_string(), replayer.backend().tip(b).map(str::to_string)))
        .collect();

    replayer.run(RunMode::Replay(&full_config())).unwrap();
    replayer.run(RunMode::Restore(&full_config())).unwrap();

    let backend = replayer.backend();
    for (branch, tip) in &before {
        if let Some(tip) = tip {
            assert_eq!(backend.tip(branch), Some(tip.as_str()), "{branch}");
        }
    }
    assert!(!backend
        .branch_names()
        .iter()
        .any(|b| b.starts_with("git-replay/")));
}

#[test]
fn test_restore_reports_missing_backups_and_continues() {
    let backend = repository().with_branch("git-replay/feature-b");
    let mut replayer = Replayer::new(backend, options(false, false));
    let backup_tip = replayer
        .backend()
        .tip("git-replay/feature-b")
        .unwrap()
        .to_string();

    let report = replayer.run(RunMode::Restore(&full_config())).unwrap();

    assert_eq!(
        report.commands,
        vec![
            "git switch --force-create feature-b git-replay/feature-b",
            "git branch --delete --force git-replay/feature-b",
        ]
    );
    assert_eq!(replayer.backend().tip("feature-b"), Some(backup_tip.as_str()));
}

#[test]
fn test_clean_removes_all_and_only_backups() {
    let backend = repository()
        .with_branch("git-replay/feature-a")
        .with_branch("git-replay/release")
        .with_branch("replay/other");
    let mut replayer = Replayer::new(backend, options(false, false));

    replayer.run(RunMode::Clean).unwrap();
    let second = replayer.run(RunMode::Clean).unwrap();

    let names = replayer.backend().branch_names();
    assert!(!names.iter().any(|b| b.starts_with("git-replay/")));
    assert!(names.contains(&"replay/other".to_string()));
    assert_eq!(second.commands.len(), 1);
}

#[test]
fn test_divergence_notices_follow_upstream_configuration() {
    let backend = repository()
        .with_upstream("feature-a", "main")
        .with_upstream("release", "main");
    let mut replayer = Replayer::new(backend, options(false, false));

    let report = replayer.run(RunMode::Replay(&full_config())).unwrap();

    assert_eq!(
        report.divergences,
        vec![
            "'feature-a' differs from its upstream 'main'".to_string(),
            "'release' differs from its upstream 'main'".to_string(),
        ]
    );
}

#[test]
fn test_branch_creation_failure_stops_everything() {
    let config = ReplayConfig::from_yaml(
        "stage:\n  no-such-start:\n    release: [commit-1]\n  main:\n    hotfix: [commit-2]\n",
    )
    .unwrap();
    let mut replayer = Replayer::new(repository(), options(false, false));

    let err = replayer.run(RunMode::Replay(&config)).unwrap_err();

    assert!(matches!(err, ReplayError::BranchCreation { .. }));
    assert!(replayer.backend().tip("hotfix").is_none());
}
