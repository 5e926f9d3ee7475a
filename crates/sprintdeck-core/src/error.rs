//! Error types for the tracker core
//!
//! One taxonomy covers every public operation:
//! - missing top-level entities
//! - dangling reference-map entries
//! - rejected creation input
//! - interrupted multi-step writes
//! - store transport failures

use sprintdeck_model::EntityKind;
use sprintdeck_store::StoreError;

/// Main tracker error type
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Requested entity absent at its own id
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What was looked up
        kind: EntityKind,
        /// The id that resolved to nothing
        id: String,
    },

    /// A reference map points at a missing entity. Distinct from
    /// [`NotFound`](TrackerError::NotFound): the parent was present, its
    /// reference was not honored by storage.
    #[error("dangling {kind} reference: {id}")]
    DanglingReference {
        /// What the reference was supposed to resolve to
        kind: EntityKind,
        /// The referenced id
        id: String,
    },

    /// Empty or whitespace-only creation input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The second write of a multi-write sequence failed. The first write
    /// already landed; `kind`/`id` identify the orphaned record.
    #[error("partial write: {kind} {id} was stored but not linked")]
    PartialWrite {
        /// Kind of the orphaned record
        kind: EntityKind,
        /// Id of the orphaned record
        id: String,
        /// What the linking write failed with
        #[source]
        source: Box<TrackerError>,
    },

    /// Store transport or codec failure, surfaced unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TrackerError {
    /// Check if this is a top-level missing entity
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a broken reference-map entry
    #[inline]
    #[must_use]
    pub fn is_dangling(&self) -> bool {
        matches!(self, Self::DanglingReference { .. })
    }

    pub(crate) fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn dangling(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::DanglingReference {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn partial_write(
        kind: EntityKind,
        id: impl Into<String>,
        source: TrackerError,
    ) -> Self {
        Self::PartialWrite {
            kind,
            id: id.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_error_display() {
        let err = TrackerError::not_found(EntityKind::Task, "t1");
        assert_eq!(err.to_string(), "task not found: t1");

        let err = TrackerError::dangling(EntityKind::Subtask, "s1");
        assert_eq!(err.to_string(), "dangling subtask reference: s1");
    }

    #[test]
    fn tracker_error_predicates() {
        assert!(TrackerError::not_found(EntityKind::Project, "p").is_not_found());
        assert!(!TrackerError::not_found(EntityKind::Project, "p").is_dangling());
        assert!(TrackerError::dangling(EntityKind::Task, "t").is_dangling());
    }

    #[test]
    fn partial_write_carries_its_cause() {
        let cause = TrackerError::not_found(EntityKind::Project, "p1");
        let err = TrackerError::partial_write(EntityKind::Task, "t1", cause);
        assert!(err.to_string().contains("stored but not linked"));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("project not found: p1"));
    }
}
