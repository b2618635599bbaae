//! Path types for hierarchical document access.
//!
//! A [`Path`] is an ordered, root-relative sequence of [`PathStep`]s locating
//! a value inside a document tree. Steps are either string keys (into maps)
//! or numeric indices (into lists).
//!
//! # String syntax
//!
//! Paths parse from dot-separated strings. A segment of the exact form `[N]`,
//! with `N` a decimal number, is an index step; any other non-empty segment
//! is a key step. The empty string parses to the root path. Empty segments
//! produced by leading, trailing, or consecutive dots are filtered out.
//!
//! ```
//! use doclens::{Path, PathStep};
//!
//! let path: Path = "friends.[2].name".parse()?;
//! assert_eq!(
//!     path.steps(),
//!     &[
//!         PathStep::Key("friends".to_string()),
//!         PathStep::Index(2),
//!         PathStep::Key("name".to_string()),
//!     ]
//! );
//! assert_eq!(path.to_string(), "friends.[2].name");
//!
//! let root: Path = "".parse()?;
//! assert!(root.is_empty());
//! # Ok::<(), doclens::PathError>(())
//! ```

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Error type for path parsing failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// An index segment `[N]` whose number does not fit an index.
    #[error("invalid index segment '{segment}' in path")]
    InvalidIndexSegment { segment: String },
}

// Conversion from PathError to the main Error type
impl From<PathError> for crate::Error {
    fn from(err: PathError) -> Self {
        crate::Error::Path(err)
    }
}

/// One step of a [`Path`]: a map key or a list index.
///
/// The same type addresses single properties in the
/// [`Document`](crate::Document) contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// A string key into a map.
    Key(String),
    /// A numeric index into a list.
    Index(usize),
}

impl PathStep {
    /// Returns `true` if this step is index-shaped.
    pub fn is_index(&self) -> bool {
        matches!(self, PathStep::Index(_))
    }

    /// Returns the key if this step is one.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathStep::Key(key) => Some(key),
            PathStep::Index(_) => None,
        }
    }

    /// Returns the index if this step is one.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathStep::Key(_) => None,
            PathStep::Index(index) => Some(*index),
        }
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(key) => write!(f, "{key}"),
            PathStep::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_string())
    }
}

impl From<String> for PathStep {
    fn from(key: String) -> Self {
        PathStep::Key(key)
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

/// An ordered, root-relative sequence of steps locating a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// Creates the empty path, which addresses the document root.
    pub fn root() -> Self {
        Path { steps: Vec::new() }
    }

    /// Returns the steps of this path.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if this is the root path.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the final step, or `None` for the root path.
    pub fn last(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    /// Appends a step in place.
    pub fn push(&mut self, step: impl Into<PathStep>) {
        self.steps.push(step.into());
    }

    /// Returns a new path with `step` appended.
    pub fn child(&self, step: impl Into<PathStep>) -> Path {
        let mut steps = self.steps.clone();
        steps.push(step.into());
        Path { steps }
    }

    /// Returns the parent path, or `None` for the root path.
    pub fn parent(&self) -> Option<Path> {
        if self.steps.is_empty() {
            None
        } else {
            Some(Path {
                steps: self.steps[..self.steps.len() - 1].to_vec(),
            })
        }
    }

    /// Returns `true` if this path begins with all steps of `prefix`.
    ///
    /// Every path starts with the root path.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.steps.len() >= prefix.steps.len()
            && self.steps[..prefix.steps.len()] == prefix.steps[..]
    }

    /// Returns an iterator over the steps.
    pub fn iter(&self) -> impl Iterator<Item = &PathStep> {
        self.steps.iter()
    }
}

impl From<Vec<PathStep>> for Path {
    fn from(steps: Vec<PathStep>) -> Self {
        Path { steps }
    }
}

impl FromIterator<PathStep> for Path {
    fn from_iter<I: IntoIterator<Item = PathStep>>(iter: I) -> Self {
        Path {
            steps: iter.into_iter().collect(),
        }
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut steps = Vec::new();
        for segment in s.split('.').filter(|segment| !segment.is_empty()) {
            steps.push(parse_segment(segment)?);
        }
        Ok(Path { steps })
    }
}

fn parse_segment(segment: &str) -> Result<PathStep, PathError> {
    let inner = segment
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'));
    match inner {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => digits
            .parse::<usize>()
            .map(PathStep::Index)
            .map_err(|_| PathError::InvalidIndexSegment {
                segment: segment.to_string(),
            }),
        _ => Ok(PathStep::Key(segment.to_string())),
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "(root)");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
