//! Dotted field paths for locating values in walked object graphs.
//!
//! This module provides [`FieldPath`], the path stack the traversal engine
//! pushes and pops while it descends through fields. Collections and maps do
//! not contribute index segments: every element of `items` reports under the
//! same `items` segment.

use std::fmt::{self, Display};

/// A path to a field in a nested object graph.
///
/// `FieldPath` represents locations like `customer.address.street`. Unlike an
/// immutable JSON path, it is used as a stack: the engine pushes a segment
/// (the field name, or its alias) before validating a field and pops it
/// afterwards.
///
/// # Example
///
/// ```rust
/// use validgraph::FieldPath;
///
/// let mut path = FieldPath::root();
/// path.push("customer");
/// path.push("email");
/// assert_eq!(path.to_string(), "customer.email");
///
/// path.pop();
/// assert_eq!(path.to_string(), "customer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Creates an empty path representing the root object.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single segment.
    pub fn from_segment(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Pushes a segment onto the end of the path.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Removes and returns the last segment, or None if this is root.
    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// Returns a new path with a segment appended, leaving this one untouched.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}
