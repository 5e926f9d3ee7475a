//! In-process tree backend.
//!
//! [`MemoryStore`] keeps the whole document tree as one JSON value
//! behind an async `RwLock` and reproduces the remote store's write
//! semantics:
//!
//! - nulls are never stored: writing `Value::Null` deletes the target
//! - empty objects do not exist: a node whose last child is removed
//!   disappears, and so do its newly-empty ancestors
//! - `push` keys are ULIDs, so they sort by creation time like the
//!   remote's generated keys
//!
//! It backs the repository in tests and in the demo binary.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::client::{ReferenceStore, StoreError};
use crate::path::StorePath;

/// A [`ReferenceStore`] holding the entire tree in memory.
#[derive(Debug)]
pub struct MemoryStore {
    root: RwLock<Value>,
}

impl MemoryStore {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Value::Null),
        }
    }

    /// Clones the whole tree, `Value::Null` when empty.
    pub async fn snapshot(&self) -> Value {
        self.root.read().await.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips nulls and empty objects; `None` means "store nothing".
fn normalized(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => {
            let map: Map<String, Value> = map
                .into_iter()
                .filter_map(|(key, value)| normalized(value).map(|value| (key, value)))
                .collect();
            if map.is_empty() {
                None
            } else {
                Some(Value::Object(map))
            }
        }
        other => Some(other),
    }
}

fn subtree<'a>(mut node: &'a Value, segments: &[String]) -> Option<&'a Value> {
    for key in segments {
        node = node.as_object()?.get(key)?;
    }
    Some(node)
}

fn write_at(node: &mut Value, segments: &[String], value: Value) {
    match segments.split_first() {
        None => *node = value,
        Some((key, rest)) => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            if let Some(map) = node.as_object_mut() {
                let child = map.entry(key.clone()).or_insert(Value::Null);
                write_at(child, rest, value);
            }
        }
    }
}

/// Removes the subtree; returns true when `node` itself became empty.
fn remove_at(node: &mut Value, segments: &[String]) -> bool {
    match segments.split_first() {
        None => {
            *node = Value::Null;
            true
        }
        Some((key, rest)) => {
            if let Some(map) = node.as_object_mut() {
                let drop_child = match map.get_mut(key.as_str()) {
                    Some(child) => remove_at(child, rest),
                    None => false,
                };
                if drop_child {
                    map.remove(key.as_str());
                }
                map.is_empty()
            } else {
                node.is_null()
            }
        }
    }
}

/// Merges fields one level deep; returns true when `node` became empty.
fn merge_at(node: &mut Value, segments: &[String], fields: Map<String, Value>) -> bool {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    let Some(map) = node.as_object_mut() else {
        return false;
    };
    match segments.split_first() {
        None => {
            for (key, value) in fields {
                match normalized(value) {
                    Some(value) => {
                        map.insert(key, value);
                    }
                    None => {
                        map.remove(&key);
                    }
                }
            }
            map.is_empty()
        }
        Some((key, rest)) => {
            let child = map.entry(key.clone()).or_insert(Value::Null);
            if merge_at(child, rest, fields) {
                map.remove(key.as_str());
            }
            map.is_empty()
        }
    }
}

#[async_trait]
impl ReferenceStore for MemoryStore {
    async fn get(&self, path: &StorePath) -> Result<Option<Value>, StoreError> {
        let root = self.root.read().await;
        Ok(match subtree(&root, path.segments()) {
            Some(Value::Null) | None => None,
            Some(node) => Some(node.clone()),
        })
    }

    async fn set(&self, path: &StorePath, value: Value) -> Result<(), StoreError> {
        let mut root = self.root.write().await;
        match normalized(value) {
            Some(value) => write_at(&mut root, path.segments(), value),
            None => {
                remove_at(&mut root, path.segments());
            }
        }
        if root.as_object().is_some_and(Map::is_empty) {
            *root = Value::Null;
        }
        Ok(())
    }

    async fn update(&self, path: &StorePath, fields: Map<String, Value>) -> Result<(), StoreError> {
        let mut root = self.root.write().await;
        if merge_at(&mut root, path.segments(), fields) {
            remove_at(&mut root, path.segments());
        }
        if root.as_object().is_some_and(Map::is_empty) {
            *root = Value::Null;
        }
        Ok(())
    }

    async fn remove(&self, path: &StorePath) -> Result<(), StoreError> {
        let mut root = self.root.write().await;
        remove_at(&mut root, path.segments());
        if root.as_object().is_some_and(Map::is_empty) {
            *root = Value::Null;
        }
        Ok(())
    }

    async fn push(&self, path: &StorePath, value: Value) -> Result<String, StoreError> {
        let key = Ulid::new().to_string();
        let child = path.child(key.as_str())?;
        self.set(&child, value).await?;
        Ok(key)
    }
}
