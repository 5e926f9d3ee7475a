//! Sprintdeck Core - the sprint-aware aggregation pipeline
//!
//! The core that:
//! - Resolves a project's flat task references into full task records,
//!   filtered to the project's current sprint
//! - Fans out and joins each task's subtask references, attaching
//!   completion from the parent task's reference map
//! - Advances a project through the fixed four-stage sprint lifecycle
//! - Writes completion state back through the typed repository
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sprintdeck_core::Tracker;
//! use sprintdeck_model::UserId;
//! use sprintdeck_store::MemoryStore;
//!
//! # async fn example() -> Result<(), sprintdeck_core::TrackerError> {
//! let tracker = Tracker::new(Arc::new(MemoryStore::new()));
//! let owner = UserId::new("u1");
//!
//! let project = tracker.create_project(&owner, "Apollo", "moonshot").await?;
//! let task = tracker.create_task(&project, "Wire the capsule", "all of it").await?;
//! tracker.complete_task(&task).await?;
//!
//! let view = tracker.hydrate(&project).await?;
//! println!("{} tasks in sprint {}", view.tasks.len(), view.sprint_level);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod error;
pub mod hydrate;
pub mod repo;
pub mod sprint;
pub mod tracker;

// Re-exports for convenience
pub use error::TrackerError;
pub use hydrate::{HydratedProject, HydratedSubtask, HydratedTask, Hydrator, ProjectListing};
pub use repo::Repository;
pub use sprint::{SprintAdvance, SprintController};
pub use tracker::Tracker;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
