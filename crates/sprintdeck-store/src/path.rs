//! Slash-separated locations in the document tree.
//!
//! A [`StorePath`] names one node in the keyed tree, e.g. `/projects/abc`
//! or `/users/u1/projects`. Paths are built from validated segments so a
//! raw id can never smuggle a separator or a reserved key character into
//! the store layer.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Characters the backing store rejects inside a single key.
const RESERVED: &[char] = &['.', '#', '$', '[', ']'];

/// Errors raised while building or parsing a [`StorePath`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A segment was empty after trimming.
    #[error("empty path segment")]
    EmptySegment,
    /// A segment contained a separator or a reserved key character.
    #[error("invalid path segment '{0}'")]
    InvalidSegment(String),
}

/// A validated location in the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    /// The root of the tree.
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Builds a path from pre-split segments, validating each one.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = Self::root();
        for segment in segments {
            path = path.child(segment)?;
        }
        Ok(path)
    }

    /// Returns this path extended by one validated segment.
    pub fn child(&self, segment: impl Into<String>) -> Result<Self, PathError> {
        let segment = segment.into();
        if segment.is_empty() {
            return Err(PathError::EmptySegment);
        }
        if segment.contains('/') || segment.contains(RESERVED) {
            return Err(PathError::InvalidSegment(segment));
        }
        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(Self { segments })
    }

    /// Returns the path one level up, or `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The individual keys from root to this node.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final key, or `None` at the root.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// True when this path names the whole tree.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of keys between the root and this node.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for StorePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix('/').unwrap_or(s);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        Self::from_segments(trimmed.split('/'))
    }
}
