//! Testing utilities for the sprintdeck workspace
//!
//! Shared fixtures: tracker-over-memory-store constructors and seed
//! helpers for integration tests.

#![allow(missing_docs)]

use std::sync::Arc;

use serde_json::json;

use sprintdeck_core::Tracker;
use sprintdeck_model::{ProjectId, SubtaskId, TaskId, UserId};
use sprintdeck_store::{MemoryStore, ReferenceStore, StorePath};

/// A tracker over a fresh in-memory store, plus the store itself so
/// tests can inspect or corrupt the raw document tree.
pub fn memory_tracker() -> (Tracker, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (Tracker::new(store.clone()), store)
}

/// The owner identity tests use unless they need several users.
pub fn test_owner() -> UserId {
    UserId::new("test-user")
}

/// A seeded project and the ids of everything created under it.
pub struct SeededProject {
    pub owner: UserId,
    pub project: ProjectId,
    /// One entry per task, in creation order, with its subtasks.
    pub tasks: Vec<(TaskId, Vec<SubtaskId>)>,
}

/// Seeds a project with `tasks` tasks, each carrying `subtasks_per_task`
/// subtasks, all in sprint 1.
pub async fn seed_project(
    tracker: &Tracker,
    tasks: usize,
    subtasks_per_task: usize,
) -> SeededProject {
    let owner = test_owner();
    let project = tracker
        .create_project(&owner, "Seeded project", "fixture")
        .await
        .unwrap();

    let mut seeded = Vec::with_capacity(tasks);
    for t in 1..=tasks {
        let task = tracker
            .create_task(&project, &format!("Task {t}"), "fixture task")
            .await
            .unwrap();
        let mut subtasks = Vec::with_capacity(subtasks_per_task);
        for s in 1..=subtasks_per_task {
            subtasks.push(
                tracker
                    .create_subtask(&task, &format!("Subtask {t}.{s}"), "fixture subtask")
                    .await
                    .unwrap(),
            );
        }
        seeded.push((task, subtasks));
    }

    SeededProject {
        owner,
        project,
        tasks: seeded,
    }
}

/// Writes a raw project document with the given task reference map,
/// bypassing the repository. Entries are `(task id, sprint level)`.
pub async fn write_raw_project(
    store: &MemoryStore,
    id: &str,
    sprint_level: u8,
    task_refs: &[(&str, u8)],
) -> ProjectId {
    let refs: serde_json::Map<String, serde_json::Value> = task_refs
        .iter()
        .map(|(task, level)| (task.to_string(), json!(level)))
        .collect();
    let doc = json!({
        "name": format!("raw-{id}"),
        "description": "raw fixture",
        "start_time": "2024-03-01T09:30:00Z",
        "active": true,
        "sprint_level": sprint_level,
        "tasks": refs,
    });
    let path: StorePath = format!("/projects/{id}").parse().unwrap();
    store.set(&path, doc).await.unwrap();
    ProjectId::new(id)
}

/// Writes a raw task document with the given subtask reference map,
/// bypassing the repository. Entries are `(subtask id, completed)`.
pub async fn write_raw_task(
    store: &MemoryStore,
    id: &str,
    subtask_refs: &[(&str, bool)],
) -> TaskId {
    let refs: serde_json::Map<String, serde_json::Value> = subtask_refs
        .iter()
        .map(|(subtask, completed)| (subtask.to_string(), json!(completed)))
        .collect();
    let doc = json!({
        "title": format!("raw-{id}"),
        "description": "raw fixture",
        "completed": false,
        "created": "2024-03-01T09:30:00Z",
        "subtasks": refs,
    });
    let path: StorePath = format!("/tasks/{id}").parse().unwrap();
    store.set(&path, doc).await.unwrap();
    TaskId::new(id)
}

/// Writes a raw subtask document, optionally with a stray `completed`
/// field the model must ignore.
pub async fn write_raw_subtask(store: &MemoryStore, id: &str, stray_completed: Option<bool>) -> SubtaskId {
    let mut doc = json!({
        "title": format!("raw-{id}"),
        "description": "raw fixture",
    });
    if let Some(flag) = stray_completed {
        doc["completed"] = json!(flag);
    }
    let path: StorePath = format!("/subtasks/{id}").parse().unwrap();
    store.set(&path, doc).await.unwrap();
    SubtaskId::new(id)
}

/// Deletes the document at `path`, simulating a dangling reference.
pub async fn delete_raw(store: &MemoryStore, path: &str) {
    let path: StorePath = path.parse().unwrap();
    store.remove(&path).await.unwrap();
}
