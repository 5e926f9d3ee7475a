//! The tracker facade
//!
//! [`Tracker`] bundles the repository, the aggregation engine, and the
//! sprint controller behind the one surface an outer layer (HTTP, CLI)
//! calls: plain identifiers in, a success payload or a
//! [`TrackerError`] kind out. No business logic lives outside this
//! crate; the outer layer only translates results into responses.

use std::sync::Arc;

use sprintdeck_model::{ProjectId, SubtaskId, TaskId, UserId};
use sprintdeck_store::ReferenceStore;

use crate::error::TrackerError;
use crate::hydrate::{HydratedProject, Hydrator, ProjectListing};
use crate::repo::Repository;
use crate::sprint::{SprintAdvance, SprintController};

/// The public operation surface of the tracker core.
#[derive(Clone)]
pub struct Tracker {
    repo: Repository,
    hydrator: Hydrator,
    sprints: SprintController,
}

impl Tracker {
    /// Assemble the core over any store backend.
    #[must_use]
    pub fn new(store: Arc<dyn ReferenceStore>) -> Self {
        let repo = Repository::new(store);
        Self {
            hydrator: Hydrator::new(repo.clone()),
            sprints: SprintController::new(repo.clone()),
            repo,
        }
    }

    /// Direct access to the typed repository, for callers that need raw
    /// entity reads (and for test fixtures).
    #[inline]
    #[must_use]
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Build the fully resolved, sprint-filtered view of a project.
    pub async fn hydrate(&self, project: &ProjectId) -> Result<HydratedProject, TrackerError> {
        self.hydrator.hydrate(project).await
    }

    /// List every project linked in a user's index.
    pub async fn user_projects(&self, user: &UserId) -> Result<Vec<ProjectListing>, TrackerError> {
        self.hydrator.user_projects(user).await
    }

    /// Create a project owned by `user`.
    pub async fn create_project(
        &self,
        user: &UserId,
        name: &str,
        description: &str,
    ) -> Result<ProjectId, TrackerError> {
        self.repo.create_project(user, name, description).await
    }

    /// Create a task filed under the project's current sprint.
    pub async fn create_task(
        &self,
        project: &ProjectId,
        title: &str,
        description: &str,
    ) -> Result<TaskId, TrackerError> {
        self.repo.create_task(project, title, description).await
    }

    /// Create a subtask under a task, initially incomplete.
    pub async fn create_subtask(
        &self,
        task: &TaskId,
        title: &str,
        description: &str,
    ) -> Result<SubtaskId, TrackerError> {
        self.repo.create_subtask(task, title, description).await
    }

    /// Mark a task complete. Idempotent.
    pub async fn complete_task(&self, task: &TaskId) -> Result<(), TrackerError> {
        self.repo.set_task_complete(task).await
    }

    /// Mark a subtask complete in its parent task's reference map.
    /// Idempotent, and never touches the parent's own completed flag.
    pub async fn complete_subtask(
        &self,
        task: &TaskId,
        subtask: &SubtaskId,
    ) -> Result<(), TrackerError> {
        self.repo.set_subtask_complete(task, subtask).await
    }

    /// Advance the project one sprint stage, or report from the final one.
    pub async fn advance_sprint(&self, project: &ProjectId) -> Result<SprintAdvance, TrackerError> {
        self.sprints.advance(project).await
    }

    /// Remove the project from the user's index. The project record and
    /// everything it references stay in storage.
    pub async fn unlink_project(
        &self,
        user: &UserId,
        project: &ProjectId,
    ) -> Result<(), TrackerError> {
        self.repo.unlink_project(user, project).await
    }
}
