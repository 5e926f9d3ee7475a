//! Stored entities and their reference maps
//!
//! One-to-many relations are flat maps on the parent: `task_refs` on a
//! project, `subtask_refs` on a task, the project index on a user. Child
//! records are never embedded. Each map value carries the one piece of
//! relationship metadata the pipeline needs (sprint number, completed flag),
//! and one child's entry can be rewritten without touching its siblings.
//!
//! Field renames pin the document store's names (`tasks`, `subtasks`);
//! `#[serde(default)]` covers documents written before a map had entries,
//! which the store persists with the field absent.

use crate::ids::{ProjectId, SubtaskId, TaskId};
use crate::sprint::SprintLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A user's back-reference set of owned projects
///
/// Values are always `true`; the map is a set in document-store clothing.
/// Removing an entry unlinks the project without deleting its record.
pub type ProjectIndex = HashMap<ProjectId, bool>;

/// Entity kinds, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Project,
    Task,
    Subtask,
}

impl EntityKind {
    /// Lowercase noun used in log and error messages
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::Task => "task",
            EntityKind::Subtask => "subtask",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project document (`/projects/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Creation instant
    pub start_time: DateTime<Utc>,
    /// Whether the project is live
    pub active: bool,
    /// Current sprint stage; absent in very old documents, meaning stage 1
    #[serde(default)]
    pub sprint_level: SprintLevel,
    /// Task reference map: task key → sprint level the project was in when
    /// the task was linked (invariant: tasks never move between sprints)
    #[serde(rename = "tasks", default, skip_serializing_if = "HashMap::is_empty")]
    pub task_refs: HashMap<TaskId, SprintLevel>,
}

impl Project {
    /// Fresh project record: active, stage 1, no tasks
    #[inline]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            start_time,
            active: true,
            sprint_level: SprintLevel::FIRST,
            task_refs: HashMap::new(),
        }
    }

    /// Task keys filed under the given sprint level
    pub fn tasks_in_sprint(&self, level: SprintLevel) -> impl Iterator<Item = &TaskId> {
        self.task_refs
            .iter()
            .filter(move |(_, filed)| **filed == level)
            .map(|(id, _)| id)
    }
}

/// Task document (`/tasks/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Display title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Task-level completion, independent of subtask completion
    pub completed: bool,
    /// Creation instant
    pub created: DateTime<Utc>,
    /// Set once by `set_task_complete`; absent until then
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,
    /// Subtask reference map: subtask key → completed flag. This map is the
    /// single source of truth for subtask completion; the subtask record
    /// itself never stores one.
    #[serde(rename = "subtasks", default, skip_serializing_if = "HashMap::is_empty")]
    pub subtask_refs: HashMap<SubtaskId, bool>,
}

impl Task {
    /// Fresh task record: incomplete, no subtasks
    #[inline]
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            completed: false,
            created,
            completion_date: None,
            subtask_refs: HashMap::new(),
        }
    }
}

/// Subtask document (`/subtasks/{id}`)
///
/// Identity plus immutable display data. Completion lives in the owning
/// task's `subtask_refs`; any stray field on the document is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    /// Display title
    pub title: String,
    /// Free-form description
    pub description: String,
}

impl Subtask {
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}
