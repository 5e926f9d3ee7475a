//! Sprint lifecycle behavior: the capped four-stage progression and the
//! permanent exclusion of tasks filed under earlier sprints.

use proptest::prelude::*;

use sprintdeck_core::{SprintAdvance, TrackerError};
use sprintdeck_model::SprintLevel;
use sprintdeck_test_utils::{memory_tracker, seed_project, test_owner};

#[tokio::test]
async fn five_advances_yield_two_three_four_reported_reported() {
    let (tracker, _) = memory_tracker();
    let seeded = seed_project(&tracker, 0, 0).await;

    let mut outcomes = Vec::new();
    for _ in 0..5 {
        outcomes.push(tracker.advance_sprint(&seeded.project).await.unwrap());
    }

    assert_eq!(
        outcomes,
        vec![
            SprintAdvance::Advanced(SprintLevel::new(2).unwrap()),
            SprintAdvance::Advanced(SprintLevel::new(3).unwrap()),
            SprintAdvance::Advanced(SprintLevel::LAST),
            SprintAdvance::Reported,
            SprintAdvance::Reported,
        ]
    );

    let project = tracker.repository().project(&seeded.project).await.unwrap();
    assert_eq!(project.sprint_level, SprintLevel::LAST);
}

#[tokio::test]
async fn advancing_hides_earlier_sprint_tasks_for_good() {
    let (tracker, _) = memory_tracker();
    let seeded = seed_project(&tracker, 2, 0).await;

    tracker.advance_sprint(&seeded.project).await.unwrap();
    let sprint2_task = tracker
        .create_task(&seeded.project, "Sprint 2 work", "d")
        .await
        .unwrap();

    let view = tracker.hydrate(&seeded.project).await.unwrap();
    assert_eq!(view.sprint_level, SprintLevel::new(2).unwrap());
    assert_eq!(view.tasks.len(), 1);
    assert_eq!(view.tasks[0].id, sprint2_task);

    // The sprint-1 tasks are gone from the view but not from storage.
    for (task, _) in &seeded.tasks {
        assert!(tracker.repository().task(task).await.is_ok());
    }
}

#[tokio::test]
async fn new_tasks_are_filed_under_the_sprint_they_were_created_in() {
    let (tracker, _) = memory_tracker();
    let owner = test_owner();
    let project = tracker.create_project(&owner, "P", "d").await.unwrap();

    let early = tracker.create_task(&project, "early", "d").await.unwrap();
    tracker.advance_sprint(&project).await.unwrap();
    tracker.advance_sprint(&project).await.unwrap();
    let late = tracker.create_task(&project, "late", "d").await.unwrap();

    let stored = tracker.repository().project(&project).await.unwrap();
    assert_eq!(stored.task_refs.get(&early), Some(&SprintLevel::FIRST));
    assert_eq!(stored.task_refs.get(&late), Some(&SprintLevel::new(3).unwrap()));
}

#[tokio::test]
async fn advance_surfaces_a_missing_project() {
    let (tracker, _) = memory_tracker();
    let err = tracker
        .advance_sprint(&sprintdeck_model::ProjectId::new("nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::NotFound { .. }));
}

proptest! {
    // For any advance sequence: levels never decrease, never skip, never
    // exceed 4, and Reported is absorbing.
    #[test]
    fn prop_advance_is_monotone_capped_and_terminal(advances in 0usize..12) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let (tracker, _) = memory_tracker();
            let seeded = seed_project(&tracker, 0, 0).await;

            let mut previous = SprintLevel::FIRST;
            let mut reported = false;
            for _ in 0..advances {
                let outcome = tracker.advance_sprint(&seeded.project).await.unwrap();
                match outcome {
                    SprintAdvance::Advanced(level) => {
                        prop_assert!(!reported, "advanced again after reporting");
                        prop_assert_eq!(level.get(), previous.get() + 1);
                        previous = level;
                    }
                    SprintAdvance::Reported => {
                        prop_assert_eq!(previous, SprintLevel::LAST);
                        reported = true;
                    }
                }
                let stored = tracker.repository().project(&seeded.project).await.unwrap();
                prop_assert_eq!(stored.sprint_level, previous);
                prop_assert!(stored.sprint_level.get() <= 4);
            }
            Ok(())
        })?;
    }
}
