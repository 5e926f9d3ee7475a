//! Sprintdeck Data Model
//!
//! Entity types for the sprint tracker and their document wire formats.
//!
//! # Core Concepts
//!
//! - [`Project`], [`Task`], [`Subtask`]: the stored entities
//! - [`ProjectId`], [`TaskId`], [`SubtaskId`], [`UserId`]: opaque
//!   store-generated identifiers
//! - [`SprintLevel`]: the 1–4 stage a project is currently in
//! - Reference maps (`task_refs`, `subtask_refs`, [`ProjectIndex`]): flat
//!   parent-held child maps standing in for embedded object graphs
//!
//! Entities serialize with the field names the document store uses, so a
//! record written by this crate is interchangeable with pre-existing data.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod entity;
mod ids;
mod sprint;

// Re-exports
pub use entity::{EntityKind, Project, ProjectIndex, Subtask, Task};
pub use ids::{ProjectId, SubtaskId, TaskId, UserId};
pub use sprint::{SprintLevel, SprintLevelError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
