//! Aggregation Engine
//!
//! Turns a project's flat reference maps into the fully resolved,
//! render-ready nested view:
//!
//! - task references are filtered to the project's current sprint level
//! - the selected tasks are fetched concurrently behind one barrier
//! - each task's subtask references are fetched concurrently behind a
//!   second, per-task barrier
//! - each subtask's completed flag comes from the parent task's
//!   reference map, never from the subtask document
//!
//! Any reference that no longer resolves fails the whole view with
//! `DanglingReference`; the engine never silently drops an entity.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;

use sprintdeck_model::{
    EntityKind, Project, ProjectId, SprintLevel, SubtaskId, TaskId, UserId,
};

use crate::error::TrackerError;
use crate::repo::Repository;

/// A subtask with completion attached from the parent task's map.
#[derive(Debug, Clone, Serialize)]
pub struct HydratedSubtask {
    /// Subtask key
    pub id: SubtaskId,
    /// Display title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Completion flag held by the parent task
    pub completed: bool,
}

/// A task with all of its subtasks resolved.
#[derive(Debug, Clone, Serialize)]
pub struct HydratedTask {
    /// Task key
    pub id: TaskId,
    /// Display title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Task-level completion, independent of subtask completion
    pub completed: bool,
    /// Creation instant
    pub created: DateTime<Utc>,
    /// Completion instant, absent until the task completes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,
    /// Resolved subtasks, order insignificant
    pub subtasks: Vec<HydratedSubtask>,
}

/// The render-ready view of one project at its current sprint.
#[derive(Debug, Clone, Serialize)]
pub struct HydratedProject {
    /// Project key
    pub id: ProjectId,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Creation instant
    pub start_time: DateTime<Utc>,
    /// Whether the project is live
    pub active: bool,
    /// The sprint level the view was filtered to
    pub sprint_level: SprintLevel,
    /// Resolved tasks filed under `sprint_level`, order insignificant
    pub tasks: Vec<HydratedTask>,
}

/// One entry of a user's project listing.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectListing {
    /// Project key
    pub id: ProjectId,
    /// The project record as stored
    #[serde(flatten)]
    pub project: Project,
}

/// Resolves reference maps into nested views.
#[derive(Clone)]
pub struct Hydrator {
    repo: Repository,
}

impl Hydrator {
    /// Create an engine over the given repository
    #[inline]
    #[must_use]
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Build the full nested view of a project.
    ///
    /// # Workflow
    /// 1. Fetch the project; its `sprint_level` selects the view
    /// 2. Keep only task references filed under that level
    /// 3. Fetch the selected tasks concurrently, wait for all of them
    /// 4. Per task, fetch its subtasks concurrently, wait for all of
    ///    them, and attach completion from the task's reference map
    /// 5. Assemble the nested structure
    ///
    /// # Errors
    /// `NotFound` when the project id itself resolves to nothing;
    /// `DanglingReference` when any referenced task or subtask is
    /// missing. Sibling fetches already in flight run to completion and
    /// are discarded on error.
    pub async fn hydrate(&self, id: &ProjectId) -> Result<HydratedProject, TrackerError> {
        let project = self.repo.project(id).await?;
        let sprint = project.sprint_level;
        let selected: Vec<&TaskId> = project.tasks_in_sprint(sprint).collect();
        tracing::debug!(
            "Hydrating project {}: {} of {} task refs in sprint {}",
            id,
            selected.len(),
            project.task_refs.len(),
            sprint
        );

        let resolved = join_all(selected.into_iter().map(|task_id| self.resolve_task(task_id))).await;
        let mut tasks = Vec::with_capacity(resolved.len());
        for outcome in resolved {
            tasks.push(outcome?);
        }

        Ok(HydratedProject {
            id: id.clone(),
            name: project.name,
            description: project.description,
            start_time: project.start_time,
            active: project.active,
            sprint_level: sprint,
            tasks,
        })
    }

    /// List every project linked in a user's index.
    ///
    /// An absent index is an empty listing. A dangling index entry fails
    /// the whole listing, same policy as [`hydrate`](Self::hydrate).
    pub async fn user_projects(&self, user: &UserId) -> Result<Vec<ProjectListing>, TrackerError> {
        let index = self.repo.project_index(user).await?;
        tracing::debug!("Listing {} linked projects for user {}", index.len(), user);

        let resolved = join_all(index.keys().map(|id| self.resolve_listing(id))).await;
        let mut listings = Vec::with_capacity(resolved.len());
        for outcome in resolved {
            listings.push(outcome?);
        }
        Ok(listings)
    }

    async fn resolve_task(&self, id: &TaskId) -> Result<HydratedTask, TrackerError> {
        let task = self
            .repo
            .task(id)
            .await
            .map_err(|err| as_dangling(err, EntityKind::Task, id.as_str()))?;
        tracing::debug!("Resolving {} subtask refs for task {}", task.subtask_refs.len(), id);

        let resolved = join_all(
            task.subtask_refs
                .iter()
                .map(|(subtask_id, completed)| self.resolve_subtask(subtask_id, *completed)),
        )
        .await;
        let mut subtasks = Vec::with_capacity(resolved.len());
        for outcome in resolved {
            subtasks.push(outcome?);
        }

        Ok(HydratedTask {
            id: id.clone(),
            title: task.title,
            description: task.description,
            completed: task.completed,
            created: task.created,
            completion_date: task.completion_date,
            subtasks,
        })
    }

    async fn resolve_listing(&self, id: &ProjectId) -> Result<ProjectListing, TrackerError> {
        let project = self
            .repo
            .project(id)
            .await
            .map_err(|err| as_dangling(err, EntityKind::Project, id.as_str()))?;
        Ok(ProjectListing {
            id: id.clone(),
            project,
        })
    }

    async fn resolve_subtask(
        &self,
        id: &SubtaskId,
        completed: bool,
    ) -> Result<HydratedSubtask, TrackerError> {
        let subtask = self
            .repo
            .subtask(id)
            .await
            .map_err(|err| as_dangling(err, EntityKind::Subtask, id.as_str()))?;
        Ok(HydratedSubtask {
            id: id.clone(),
            title: subtask.title,
            description: subtask.description,
            completed,
        })
    }
}

/// A missing referenced entity is a broken reference, not a plain miss.
fn as_dangling(err: TrackerError, kind: EntityKind, id: &str) -> TrackerError {
    match err {
        TrackerError::NotFound { .. } => TrackerError::dangling(kind, id),
        other => other,
    }
}
