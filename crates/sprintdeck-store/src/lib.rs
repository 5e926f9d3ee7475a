//! Keyed document store for the sprintdeck tracker.
//!
//! This crate defines how the tracker talks to its document tree:
//!
//! - [`StorePath`]: validated slash-separated locations
//! - [`ReferenceStore`]: the async contract (get, set, update, remove,
//!   push) every backend implements
//! - [`MemoryStore`]: an in-process backend with the remote store's
//!   null-deletion and key-generation semantics
//!
//! Higher layers never see backend internals, only `serde_json::Value`
//! nodes addressed by path.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod client;
pub mod memory;
pub mod path;

pub use client::{ReferenceStore, StoreError};
pub use memory::MemoryStore;
pub use path::{PathError, StorePath};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
