//! The store contract every backend implements.
//!
//! Consumers speak to the tree through [`ReferenceStore`]: point reads,
//! whole-node writes, shallow merges, deletions, and key-generating
//! appends. Backends return raw [`serde_json::Value`] nodes; shaping
//! them into domain types is the caller's concern.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::path::{PathError, StorePath};

/// Failures surfaced by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend itself failed (transport, I/O, rejected write).
    #[error("store backend: {0}")]
    Backend(String),
    /// A path could not be assembled from the given keys.
    #[error("invalid store path: {0}")]
    InvalidPath(#[from] PathError),
    /// A value could not be encoded for, or decoded from, the tree.
    #[error("store codec: {0}")]
    Codec(#[from] serde_json::Error),
}

/// A keyed document tree addressed by [`StorePath`].
///
/// The contract mirrors the remote store the tracker was built against:
///
/// - [`get`](ReferenceStore::get) clones the subtree at a path, `None`
///   when nothing is stored there.
/// - [`set`](ReferenceStore::set) replaces the node wholesale, creating
///   intermediate nodes as needed.
/// - [`update`](ReferenceStore::update) merges fields one level deep,
///   leaving sibling fields untouched.
/// - [`remove`](ReferenceStore::remove) deletes the subtree.
/// - [`push`](ReferenceStore::push) appends under a generated,
///   time-ordered key and returns that key.
///
/// Writing `Value::Null` through `set` or an `update` field deletes the
/// target instead of storing a null, matching the remote semantics.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    /// Reads the subtree at `path`.
    async fn get(&self, path: &StorePath) -> Result<Option<Value>, StoreError>;

    /// Replaces the node at `path` with `value`.
    async fn set(&self, path: &StorePath, value: Value) -> Result<(), StoreError>;

    /// Merges `fields` into the node at `path`, one level deep.
    async fn update(&self, path: &StorePath, fields: Map<String, Value>) -> Result<(), StoreError>;

    /// Deletes the subtree at `path`.
    async fn remove(&self, path: &StorePath) -> Result<(), StoreError>;

    /// Stores `value` under a fresh generated key in the collection at
    /// `path` and returns the key.
    async fn push(&self, path: &StorePath, value: Value) -> Result<String, StoreError>;
}
