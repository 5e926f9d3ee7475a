//! End-to-end hydration behavior: sprint filtering, the completion
//! join, dangling-reference failures, and user project listings.

use sprintdeck_core::TrackerError;
use sprintdeck_model::{SprintLevel, TaskId, UserId};
use sprintdeck_test_utils::{
    delete_raw, memory_tracker, seed_project, write_raw_project, write_raw_subtask,
    write_raw_task,
};

#[tokio::test]
async fn hydrate_filters_tasks_to_the_current_sprint() {
    let (tracker, store) = memory_tracker();
    write_raw_task(&store, "t1", &[]).await;
    write_raw_task(&store, "t2", &[]).await;
    write_raw_task(&store, "t3", &[]).await;
    let project =
        write_raw_project(&store, "p1", 1, &[("t1", 1), ("t2", 2), ("t3", 1)]).await;

    let view = tracker.hydrate(&project).await.unwrap();

    assert_eq!(view.sprint_level, SprintLevel::FIRST);
    let mut visible: Vec<&str> = view.tasks.iter().map(|t| t.id.as_str()).collect();
    visible.sort_unstable();
    assert_eq!(visible, vec!["t1", "t3"]);
}

#[tokio::test]
async fn hydrate_takes_subtask_completion_from_the_parent_map() {
    let (tracker, store) = memory_tracker();
    // The s1 document carries a stray completed=false; the parent map
    // says true and the parent map wins. s2 carries no flag at all.
    write_raw_subtask(&store, "s1", Some(false)).await;
    write_raw_subtask(&store, "s2", None).await;
    write_raw_task(&store, "t1", &[("s1", true), ("s2", false)]).await;
    let project = write_raw_project(&store, "p1", 1, &[("t1", 1)]).await;

    let view = tracker.hydrate(&project).await.unwrap();

    assert_eq!(view.tasks.len(), 1);
    let subtasks = &view.tasks[0].subtasks;
    assert_eq!(subtasks.len(), 2);
    let completed = |id: &str| {
        subtasks
            .iter()
            .find(|s| s.id.as_str() == id)
            .unwrap()
            .completed
    };
    assert!(completed("s1"));
    assert!(!completed("s2"));
}

#[tokio::test]
async fn hydrate_fails_on_a_dangling_task_reference() {
    let (tracker, store) = memory_tracker();
    let seeded = seed_project(&tracker, 2, 0).await;
    let (gone, _) = &seeded.tasks[0];
    delete_raw(&store, &format!("/tasks/{gone}")).await;

    let err = tracker.hydrate(&seeded.project).await.unwrap_err();
    match err {
        TrackerError::DanglingReference { id, .. } => assert_eq!(id, gone.as_str()),
        other => panic!("expected DanglingReference, got {other}"),
    }
}

#[tokio::test]
async fn hydrate_fails_on_a_dangling_subtask_reference() {
    let (tracker, store) = memory_tracker();
    let seeded = seed_project(&tracker, 1, 2).await;
    let (_, subtasks) = &seeded.tasks[0];
    delete_raw(&store, &format!("/subtasks/{}", subtasks[1])).await;

    let err = tracker.hydrate(&seeded.project).await.unwrap_err();
    assert!(err.is_dangling());
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn hydrate_distinguishes_a_missing_project_from_a_dangling_reference() {
    let (tracker, _) = memory_tracker();
    let err = tracker
        .hydrate(&sprintdeck_model::ProjectId::new("never-created"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_dangling());
}

#[tokio::test]
async fn listing_resolves_every_linked_project() {
    let (tracker, _) = memory_tracker();
    let owner = UserId::new("u1");
    let a = tracker.create_project(&owner, "Alpha", "d").await.unwrap();
    let b = tracker.create_project(&owner, "Beta", "d").await.unwrap();

    let listings = tracker.user_projects(&owner).await.unwrap();
    assert_eq!(listings.len(), 2);
    let mut ids: Vec<_> = listings.iter().map(|l| l.id.clone()).collect();
    ids.sort();
    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn listing_an_absent_index_is_empty() {
    let (tracker, _) = memory_tracker();
    let listings = tracker.user_projects(&UserId::new("nobody")).await.unwrap();
    assert!(listings.is_empty());
}

#[tokio::test]
async fn listing_fails_on_a_dangling_index_entry() {
    let (tracker, store) = memory_tracker();
    let owner = UserId::new("u1");
    let project = tracker.create_project(&owner, "Alpha", "d").await.unwrap();
    delete_raw(&store, &format!("/projects/{project}")).await;

    let err = tracker.user_projects(&owner).await.unwrap_err();
    assert!(err.is_dangling());
}

#[tokio::test]
async fn unlinked_projects_stay_hydratable_by_id() {
    // Deletion is unlink-only: the record and its tasks survive,
    // permanently orphaned but still addressable. Verified as intended
    // behavior, not patched over with a cascading delete.
    let (tracker, _) = memory_tracker();
    let seeded = seed_project(&tracker, 1, 1).await;

    tracker
        .unlink_project(&seeded.owner, &seeded.project)
        .await
        .unwrap();

    let listings = tracker.user_projects(&seeded.owner).await.unwrap();
    assert!(listings.is_empty());

    let view = tracker.hydrate(&seeded.project).await.unwrap();
    assert_eq!(view.tasks.len(), 1);
    assert_eq!(view.tasks[0].subtasks.len(), 1);
}

#[tokio::test]
async fn full_lifecycle_scenario() {
    let (tracker, _) = memory_tracker();
    let owner = UserId::new("u1");

    let project = tracker.create_project(&owner, "P1", "scenario").await.unwrap();
    let task: TaskId = tracker.create_task(&project, "T1", "d").await.unwrap();
    let subtask = tracker.create_subtask(&task, "S1", "d").await.unwrap();

    let view = tracker.hydrate(&project).await.unwrap();
    assert_eq!(view.tasks.len(), 1);
    assert_eq!(view.tasks[0].subtasks.len(), 1);
    assert!(!view.tasks[0].subtasks[0].completed);

    tracker.complete_subtask(&task, &subtask).await.unwrap();
    let view = tracker.hydrate(&project).await.unwrap();
    assert!(view.tasks[0].subtasks[0].completed);
    // Subtask completion never bubbles up to the task itself.
    assert!(!view.tasks[0].completed);

    for _ in 0..4 {
        tracker.advance_sprint(&project).await.unwrap();
    }
    let fifth = tracker.advance_sprint(&project).await.unwrap();
    assert!(fifth.is_reported());

    // Every task was filed under sprint 1; at sprint 4 none are visible.
    let view = tracker.hydrate(&project).await.unwrap();
    assert_eq!(view.sprint_level, SprintLevel::LAST);
    assert!(view.tasks.is_empty());
}
