//! Entity Repository
//!
//! Typed read/write operations for Project, Task, Subtask, and the
//! user → project index, built directly on the store contract:
//!
//! - reads translate the store's absent payload into `NotFound`
//! - creations are two writes (push the record, link it into its
//!   parent's reference map); a failed second write surfaces as
//!   `PartialWrite` naming the orphaned record
//! - completion and sprint writes are shallow merges that never rewrite
//!   sibling fields

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use sprintdeck_model::{
    EntityKind, Project, ProjectId, ProjectIndex, SprintLevel, Subtask, SubtaskId, Task, TaskId,
    UserId,
};
use sprintdeck_store::{ReferenceStore, StoreError, StorePath};

use crate::error::TrackerError;

const PROJECTS: &str = "projects";
const TASKS: &str = "tasks";
const SUBTASKS: &str = "subtasks";
const USERS: &str = "users";

/// Typed gateway to the document tree.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn ReferenceStore>,
}

impl Repository {
    /// Create a repository over any store backend
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn ReferenceStore>) -> Self {
        Self { store }
    }

    fn project_path(id: &ProjectId) -> Result<StorePath, StoreError> {
        Ok(StorePath::root().child(PROJECTS)?.child(id.as_str())?)
    }

    fn task_path(id: &TaskId) -> Result<StorePath, StoreError> {
        Ok(StorePath::root().child(TASKS)?.child(id.as_str())?)
    }

    fn subtask_path(id: &SubtaskId) -> Result<StorePath, StoreError> {
        Ok(StorePath::root().child(SUBTASKS)?.child(id.as_str())?)
    }

    /// `/users/{uid}/projects`, the owner's back-reference set
    fn index_path(user: &UserId) -> Result<StorePath, StoreError> {
        Ok(StorePath::root()
            .child(USERS)?
            .child(user.as_str())?
            .child(PROJECTS)?)
    }

    async fn read<T>(&self, kind: EntityKind, path: &StorePath, id: &str) -> Result<T, TrackerError>
    where
        T: DeserializeOwned,
    {
        let value = self
            .store
            .get(path)
            .await?
            .ok_or_else(|| TrackerError::not_found(kind, id))?;
        Ok(serde_json::from_value(value).map_err(StoreError::Codec)?)
    }

    /// Fetch a project by id
    pub async fn project(&self, id: &ProjectId) -> Result<Project, TrackerError> {
        let path = Self::project_path(id)?;
        self.read(EntityKind::Project, &path, id.as_str()).await
    }

    /// Fetch a task by id
    pub async fn task(&self, id: &TaskId) -> Result<Task, TrackerError> {
        let path = Self::task_path(id)?;
        self.read(EntityKind::Task, &path, id.as_str()).await
    }

    /// Fetch a subtask by id
    pub async fn subtask(&self, id: &SubtaskId) -> Result<Subtask, TrackerError> {
        let path = Self::subtask_path(id)?;
        self.read(EntityKind::Subtask, &path, id.as_str()).await
    }

    /// Fetch a user's project index; an absent document is an empty index,
    /// not an error
    pub async fn project_index(&self, user: &UserId) -> Result<ProjectIndex, TrackerError> {
        let path = Self::index_path(user)?;
        match self.store.get(&path).await? {
            Some(value) => Ok(serde_json::from_value(value).map_err(StoreError::Codec)?),
            None => Ok(ProjectIndex::new()),
        }
    }

    /// Store a new project and link it into the owner's index.
    ///
    /// Two writes, not transactional: if the link fails, the stored
    /// project is orphaned and the error reports it as `PartialWrite`.
    pub async fn create_project(
        &self,
        owner: &UserId,
        name: &str,
        description: &str,
    ) -> Result<ProjectId, TrackerError> {
        let name = required("name", name)?;
        let description = required("description", description)?;
        let index = Self::index_path(owner)?;
        let collection = StorePath::root().child(PROJECTS).map_err(StoreError::from)?;

        let project = Project::new(name, description, Utc::now());
        let value = serde_json::to_value(&project).map_err(StoreError::Codec)?;
        let key = self.store.push(&collection, value).await?;
        let id = ProjectId::new(key);

        let mut fields = Map::new();
        fields.insert(id.to_string(), Value::Bool(true));
        if let Err(source) = self.store.update(&index, fields).await {
            tracing::warn!("Project {} stored but not linked to user {}", id, owner);
            return Err(TrackerError::partial_write(
                EntityKind::Project,
                id.as_str(),
                TrackerError::Store(source),
            ));
        }

        tracing::info!("Created project {} for user {}", id, owner);
        Ok(id)
    }

    /// Store a new task and file it under the parent project's current
    /// sprint level.
    ///
    /// The task is pushed first; the parent is then read for its current
    /// `sprint_level` and the reference merged in. A failure after the
    /// push surfaces as `PartialWrite` naming the orphaned task.
    pub async fn create_task(
        &self,
        project_id: &ProjectId,
        title: &str,
        description: &str,
    ) -> Result<TaskId, TrackerError> {
        let title = required("title", title)?;
        let description = required("description", description)?;
        let collection = StorePath::root().child(TASKS).map_err(StoreError::from)?;

        let task = Task::new(title, description, Utc::now());
        let value = serde_json::to_value(&task).map_err(StoreError::Codec)?;
        let key = self.store.push(&collection, value).await?;
        let id = TaskId::new(key);

        if let Err(source) = self.link_task(project_id, &id).await {
            tracing::warn!("Task {} stored but not linked to project {}", id, project_id);
            return Err(TrackerError::partial_write(
                EntityKind::Task,
                id.as_str(),
                source,
            ));
        }

        tracing::info!("Created task {} in project {}", id, project_id);
        Ok(id)
    }

    /// Reads the parent for its current sprint, then merges the reference.
    async fn link_task(&self, project_id: &ProjectId, id: &TaskId) -> Result<(), TrackerError> {
        let project = self.project(project_id).await?;
        let refs = Self::project_path(project_id)?
            .child(TASKS)
            .map_err(StoreError::from)?;
        let mut fields = Map::new();
        fields.insert(id.to_string(), Value::from(project.sprint_level.get()));
        self.store.update(&refs, fields).await?;
        Ok(())
    }

    /// Store a new subtask and merge an incomplete reference onto the
    /// parent task.
    ///
    /// The parent is not read back: the reference merge lands even if the
    /// task id is stale, mirroring the remote store's behavior. A failed
    /// merge surfaces as `PartialWrite` naming the orphaned subtask.
    pub async fn create_subtask(
        &self,
        task_id: &TaskId,
        title: &str,
        description: &str,
    ) -> Result<SubtaskId, TrackerError> {
        let title = required("title", title)?;
        let description = required("description", description)?;
        let refs = Self::task_path(task_id)?
            .child(SUBTASKS)
            .map_err(StoreError::from)?;
        let collection = StorePath::root().child(SUBTASKS).map_err(StoreError::from)?;

        let subtask = Subtask::new(title, description);
        let value = serde_json::to_value(&subtask).map_err(StoreError::Codec)?;
        let key = self.store.push(&collection, value).await?;
        let id = SubtaskId::new(key);

        let mut fields = Map::new();
        fields.insert(id.to_string(), Value::Bool(false));
        if let Err(source) = self.store.update(&refs, fields).await {
            tracing::warn!("Subtask {} stored but not linked to task {}", id, task_id);
            return Err(TrackerError::partial_write(
                EntityKind::Subtask,
                id.as_str(),
                TrackerError::Store(source),
            ));
        }

        tracing::info!("Created subtask {} under task {}", id, task_id);
        Ok(id)
    }

    /// Mark a task complete and stamp the completion date.
    ///
    /// Unconditional shallow merge; repeating it rewrites the same fields.
    pub async fn set_task_complete(&self, id: &TaskId) -> Result<(), TrackerError> {
        let path = Self::task_path(id)?;
        let mut fields = Map::new();
        fields.insert("completed".into(), Value::Bool(true));
        fields.insert(
            "completion_date".into(),
            serde_json::to_value(Utc::now()).map_err(StoreError::Codec)?,
        );
        self.store.update(&path, fields).await?;
        tracing::debug!("Marked task {} complete", id);
        Ok(())
    }

    /// Flip a subtask's completed flag in the parent task's reference map.
    ///
    /// The subtask document itself is never touched; the map is the single
    /// source of truth for subtask completion.
    pub async fn set_subtask_complete(
        &self,
        task_id: &TaskId,
        subtask_id: &SubtaskId,
    ) -> Result<(), TrackerError> {
        let refs = Self::task_path(task_id)?
            .child(SUBTASKS)
            .map_err(StoreError::from)?;
        let mut fields = Map::new();
        fields.insert(subtask_id.to_string(), Value::Bool(true));
        self.store.update(&refs, fields).await?;
        tracing::debug!("Marked subtask {} of task {} complete", subtask_id, task_id);
        Ok(())
    }

    /// Write a new sprint level onto a project.
    ///
    /// Only the sprint progression controller calls this; it never reads
    /// or validates the previous value.
    pub async fn set_sprint_level(
        &self,
        id: &ProjectId,
        level: SprintLevel,
    ) -> Result<(), TrackerError> {
        let path = Self::project_path(id)?;
        let mut fields = Map::new();
        fields.insert("sprint_level".into(), Value::from(level.get()));
        self.store.update(&path, fields).await?;
        Ok(())
    }

    /// Remove a project from the user's index.
    ///
    /// The project record and everything it references stay in storage,
    /// still addressable by id.
    pub async fn unlink_project(
        &self,
        user: &UserId,
        project: &ProjectId,
    ) -> Result<(), TrackerError> {
        let entry = Self::index_path(user)?
            .child(project.as_str())
            .map_err(StoreError::from)?;
        self.store.remove(&entry).await?;
        tracing::info!("Unlinked project {} from user {}", project, user);
        Ok(())
    }
}

/// Trimmed creation input, rejecting empty and whitespace-only values
fn required(field: &'static str, value: &str) -> Result<String, TrackerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::InvalidInput(format!(
            "{field} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}
