//! Reconciliation scenarios against the in-memory tracker.

use rstest::rstest;
use tasksync_core::{parse_document, TaskRecord};
use tasksync_sync::{Reconciler, SyncError, SyncOptions, SyncOutcome};
use tasksync_tracker::{InMemoryTracker, IssueState, LabelPolicy, TrackerCall};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn tasks(doc: &str) -> Vec<TaskRecord> {
    parse_document(doc).tasks
}

fn count_calls(tracker: &InMemoryTracker, pred: impl Fn(&TrackerCall) -> bool) -> usize {
    tracker.calls().iter().filter(|&c| pred(c)).count()
}

const BACKLOG: &str = "\
## Sprint 1

#### `TASK-1` - Fix bug
- **Status:** done

#### `TASK-2` - Add export
- **Status:** ⏳ In progress
- **Priority:** 🔴 High

#### `TASK-3` - Cache posters
- **Status:** ❌ Failed
- **Priorytet:** 🟢 Niski
";

// ---------------------------------------------------------------------------
// 1. End-to-end and idempotence
// ---------------------------------------------------------------------------

#[test]
fn single_done_task_creates_then_closes() {
    init_logging();
    let doc = "#### `TASK-1` - Fix bug\n- **Status:** done\n";
    let tracker = InMemoryTracker::new();
    let reconciler = Reconciler::new(&tracker, SyncOptions::default());

    let first = reconciler.run(&tasks(doc)).expect("first run");
    assert_eq!(first.created(), 1);
    let creates: Vec<TrackerCall> = tracker
        .calls()
        .into_iter()
        .filter(|c| matches!(c, TrackerCall::CreateIssue { .. }))
        .collect();
    assert_eq!(
        creates,
        vec![TrackerCall::CreateIssue {
            title: "[TASK-1] Fix bug".to_owned(),
            labels: vec!["task".to_owned()],
        }]
    );
    assert_eq!(tracker.issues()[0].state, IssueState::Open);

    tracker.clear_calls();
    let second = reconciler.run(&tasks(doc)).expect("second run");
    assert_eq!(second.created(), 0);
    assert_eq!(
        second.outcomes,
        vec![SyncOutcome::Updated {
            id: tasks(doc)[0].id().clone(),
            number: 1,
            state: IssueState::Closed,
        }]
    );
    assert!(tracker.calls().contains(&TrackerCall::UpdateIssue {
        number: 1,
        title: "[TASK-1] Fix bug".to_owned(),
        state: IssueState::Closed,
        labels: vec!["task".to_owned()],
    }));
    assert_eq!(tracker.issues()[0].state, IssueState::Closed);
}

#[test]
fn repeated_runs_never_duplicate_issues() {
    init_logging();
    let tracker = InMemoryTracker::new();
    let reconciler = Reconciler::new(&tracker, SyncOptions::default());

    let first = reconciler.run(&tasks(BACKLOG)).expect("first");
    assert_eq!(first.created(), 3);
    assert_eq!(tracker.issues().len(), 3);

    let second = reconciler.run(&tasks(BACKLOG)).expect("second");
    assert_eq!(second.created(), 0);
    assert_eq!(second.updated(), 3);
    assert_eq!(tracker.issues().len(), 3, "one issue per task id");
}

// ---------------------------------------------------------------------------
// 2. Matching
// ---------------------------------------------------------------------------

#[test]
fn matches_by_id_despite_title_divergence() {
    let tracker = InMemoryTracker::new();
    let number = tracker.seed_issue("[TASK-7] Old title", IssueState::Closed);
    let reconciler = Reconciler::new(&tracker, SyncOptions::default());

    let report = reconciler
        .run(&tasks("#### `TASK-7` - New title\n- **Status:** reopened\n"))
        .expect("run");
    assert_eq!(report.created(), 0);
    let issue = &tracker.issues()[0];
    assert_eq!(issue.number, number);
    assert_eq!(issue.title, "[TASK-7] New title");
    assert_eq!(issue.state, IssueState::Open, "state comes from the document");
}

#[test]
fn pull_request_with_task_title_is_ignored() {
    let tracker = InMemoryTracker::new();
    tracker.seed_pull_request("[TASK-7] Implement the thing");
    let reconciler = Reconciler::new(&tracker, SyncOptions::default());

    let report = reconciler
        .run(&tasks("#### `TASK-7` - The thing\n"))
        .expect("run");
    assert_eq!(report.created(), 1);
    assert_eq!(tracker.issues().len(), 2, "PR untouched, new issue created");
    assert_eq!(tracker.issues()[0].title, "[TASK-7] Implement the thing");
}

#[test]
fn unrelated_issues_are_left_alone() {
    let tracker = InMemoryTracker::new();
    tracker.seed_issue("Crash on startup", IssueState::Open);
    let reconciler = Reconciler::new(&tracker, SyncOptions::default());

    reconciler.run(&tasks(BACKLOG)).expect("run");
    assert_eq!(tracker.issues()[0].title, "Crash on startup");
    assert_eq!(
        count_calls(&tracker, |c| matches!(c, TrackerCall::UpdateIssue { .. })),
        0
    );
}

// ---------------------------------------------------------------------------
// 3. State and labels
// ---------------------------------------------------------------------------

#[rstest]
#[case("✅ Done", IssueState::Closed)]
#[case("❌ Failed", IssueState::Closed)]
#[case("done", IssueState::Closed)]
#[case("failed", IssueState::Closed)]
#[case("⏳ In progress", IssueState::Open)]
#[case("", IssueState::Open)]
fn update_state_follows_status(#[case] status: &str, #[case] expected: IssueState) {
    let tracker = InMemoryTracker::new();
    tracker.seed_issue("[TASK-1] Fix bug", IssueState::Open);
    let doc = format!("#### `TASK-1` - Fix bug\n- **Status:** {status}\n");

    let report = Reconciler::new(&tracker, SyncOptions::default())
        .run(&tasks(&doc))
        .expect("run");
    assert!(matches!(
        report.outcomes[0],
        SyncOutcome::Updated { state, .. } if state == expected
    ));
}

#[test]
fn labels_are_provisioned_before_each_write() {
    let tracker = InMemoryTracker::new();
    Reconciler::new(&tracker, SyncOptions::default())
        .run(&tasks("#### `TASK-2` - Add export\n- **Priority:** 🔴 High\n"))
        .expect("run");

    assert_eq!(
        tracker.calls(),
        vec![
            TrackerCall::ListIssues,
            TrackerCall::LookupLabel {
                name: "task".to_owned()
            },
            TrackerCall::CreateLabel {
                name: "task".to_owned(),
                color: "0e8a16".to_owned()
            },
            TrackerCall::LookupLabel {
                name: "priority-high".to_owned()
            },
            TrackerCall::CreateLabel {
                name: "priority-high".to_owned(),
                color: "d73a4a".to_owned()
            },
            TrackerCall::CreateIssue {
                title: "[TASK-2] Add export".to_owned(),
                labels: vec!["task".to_owned(), "priority-high".to_owned()],
            },
        ]
    );
}

#[test]
fn updates_reprovision_the_base_label() {
    let tracker = InMemoryTracker::new();
    tracker.seed_issue("[TASK-1] Fix bug", IssueState::Open);
    Reconciler::new(&tracker, SyncOptions::default())
        .run(&tasks("#### `TASK-1` - Fix bug\n"))
        .expect("run");
    assert!(tracker
        .calls()
        .contains(&TrackerCall::CreateLabel {
            name: "task".to_owned(),
            color: "0e8a16".to_owned()
        }));
}

#[test]
fn priority_labels_can_be_switched_off() {
    let tracker = InMemoryTracker::new();
    let options = SyncOptions {
        labels: LabelPolicy::base_only(),
        dry_run: false,
    };
    Reconciler::new(&tracker, options)
        .run(&tasks(BACKLOG))
        .expect("run");

    let names: Vec<String> = tracker.labels().into_iter().map(|l| l.name).collect();
    assert_eq!(names, vec!["task".to_owned()]);
}

// ---------------------------------------------------------------------------
// 4. Dry run and failures
// ---------------------------------------------------------------------------

#[test]
fn dry_run_only_lists() {
    let tracker = InMemoryTracker::new();
    tracker.seed_issue("[TASK-1] Fix bug", IssueState::Open);
    let options = SyncOptions {
        dry_run: true,
        ..SyncOptions::default()
    };

    let report = Reconciler::new(&tracker, options)
        .run(&tasks(BACKLOG))
        .expect("run");
    assert!(report.dry_run);
    assert_eq!(report.created(), 2);
    assert_eq!(report.updated(), 1);
    assert_eq!(tracker.calls(), vec![TrackerCall::ListIssues]);
    assert!(tracker.labels().is_empty());
}

#[test]
fn label_lookup_failure_aborts_the_run() {
    let tracker = InMemoryTracker::new().failing_label_lookups(403);
    let err = Reconciler::new(&tracker, SyncOptions::default())
        .run(&tasks(BACKLOG))
        .unwrap_err();

    match err {
        SyncError::Tracker(inner) => assert_eq!(inner.status(), Some(403)),
        other => panic!("expected tracker error, got {other:?}"),
    }
    assert_eq!(
        count_calls(&tracker, |c| matches!(c, TrackerCall::CreateIssue { .. })),
        0
    );
    assert_eq!(
        count_calls(&tracker, |c| matches!(c, TrackerCall::LookupLabel { .. })),
        1,
        "run stops at the first failure"
    );
}

#[test]
fn outcomes_follow_document_order() {
    let tracker = InMemoryTracker::new();
    let report = Reconciler::new(&tracker, SyncOptions::default())
        .run(&tasks(BACKLOG))
        .expect("run");
    let ids: Vec<&str> = report.outcomes.iter().map(|o| o.id().as_str()).collect();
    assert_eq!(ids, vec!["TASK-1", "TASK-2", "TASK-3"]);
}
