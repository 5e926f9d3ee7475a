//! Sprint Progression Controller
//!
//! A project walks a fixed four-stage lifecycle. Each `advance` moves it
//! one stage forward and writes the new level back; advancing from the
//! final stage writes nothing and reports instead. The stored level is
//! monotonically non-decreasing and never exceeds 4.

use serde::Serialize;

use sprintdeck_model::{ProjectId, SprintLevel};

use crate::error::TrackerError;
use crate::repo::Repository;

/// Outcome of one `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "sprint_level", rename_all = "snake_case")]
pub enum SprintAdvance {
    /// The project moved to this stage; the new level is stored.
    Advanced(SprintLevel),
    /// The project was already at the final stage. Nothing was written;
    /// the caller should direct to a reporting view.
    Reported,
}

impl SprintAdvance {
    /// True when the advance ended in the terminal report state.
    #[inline]
    #[must_use]
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Reported)
    }
}

/// Drives a project through the sprint lifecycle.
#[derive(Clone)]
pub struct SprintController {
    repo: Repository,
}

impl SprintController {
    /// Create a controller over the given repository
    #[inline]
    #[must_use]
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Move the project one sprint stage forward.
    ///
    /// Reads the current level, writes back `level + 1` for stages 1–3,
    /// and returns [`SprintAdvance::Reported`] without writing from stage
    /// 4. Tasks filed under the stage being left behind stop appearing in
    /// hydrated views of this project from this point on; they stay
    /// addressable by task id.
    ///
    /// # Errors
    /// `NotFound` when the project id resolves to nothing; store errors
    /// surface unchanged.
    pub async fn advance(&self, id: &ProjectId) -> Result<SprintAdvance, TrackerError> {
        let project = self.repo.project(id).await?;
        match project.sprint_level.next() {
            Some(next) => {
                self.repo.set_sprint_level(id, next).await?;
                tracing::info!("Advanced project {} to sprint {}", id, next);
                Ok(SprintAdvance::Advanced(next))
            }
            None => {
                tracing::info!("Project {} finished sprint {}, reporting", id, project.sprint_level);
                Ok(SprintAdvance::Reported)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sprintdeck_model::UserId;
    use sprintdeck_store::MemoryStore;

    use super::*;

    fn controller() -> (SprintController, Repository) {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        (SprintController::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn advance_walks_the_lifecycle_then_reports() {
        let (controller, repo) = controller();
        let owner = UserId::new("u1");
        let id = repo.create_project(&owner, "Apollo", "d").await.unwrap();

        let mut outcomes = Vec::new();
        for _ in 0..5 {
            outcomes.push(controller.advance(&id).await.unwrap());
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

        // The stored value stays capped at the final stage.
        let project = repo.project(&id).await.unwrap();
        assert_eq!(project.sprint_level, SprintLevel::LAST);
    }

    #[tokio::test]
    async fn advance_on_a_missing_project_is_not_found() {
        let (controller, _) = controller();
        let err = controller.advance(&ProjectId::new("nope")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn advance_outcome_serializes_for_callers() {
        let advanced = SprintAdvance::Advanced(SprintLevel::new(2).unwrap());
        assert_eq!(
            serde_json::to_value(advanced).unwrap(),
            serde_json::json!({"state": "advanced", "sprint_level": 2})
        );
        assert_eq!(
            serde_json::to_value(SprintAdvance::Reported).unwrap(),
            serde_json::json!({"state": "reported"})
        );
    }
}
