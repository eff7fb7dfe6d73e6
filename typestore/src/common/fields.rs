use crate::common::FIELD_SEPARATOR;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::Display;

type Segments = SmallVec<[String; 4]>;

/// An ordered sequence of keys addressing a (possibly nested) field of a record.
///
/// Field paths are structured values rather than dotted strings, so a key that
/// itself contains a `.` is still a single segment. Order is significant and
/// preserved.
///
/// # Example
///
/// ```ignore
/// let views = field(&["meta", "views"])?;
/// assert_eq!(views.to_string(), "meta.views");
///
/// let meta = field(&["meta"])?;
/// assert!(meta.is_prefix_of(&views));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Segments,
}

impl FieldPath {
    /// Creates a field path from its segments.
    ///
    /// Fails with `InvalidFieldPath` if there are no segments or any segment is empty.
    pub fn new<S: AsRef<str>>(segments: &[S]) -> StoreResult<FieldPath> {
        if segments.is_empty() {
            log::error!("Field path must have at least one segment");
            return Err(StoreError::new(
                "Field path must have at least one segment",
                ErrorKind::InvalidFieldPath,
            ));
        }

        let mut collected = Segments::new();
        for segment in segments {
            let segment = segment.as_ref();
            if segment.is_empty() {
                log::error!("Field path {:?} contains an empty segment", collected);
                return Err(StoreError::new(
                    "Field path cannot contain an empty segment",
                    ErrorKind::InvalidFieldPath,
                ));
            }
            collected.push(segment.to_string());
        }

        Ok(FieldPath { segments: collected })
    }

    /// Parses a dotted path such as `meta.views`.
    pub fn parse(dotted: &str) -> StoreResult<FieldPath> {
        let segments: Vec<&str> = dotted.split(FIELD_SEPARATOR).collect();
        FieldPath::new(&segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The top-level field this path starts at.
    pub fn first(&self) -> &str {
        &self.segments[0]
    }

    /// The innermost key of this path.
    pub fn last(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// The path without its last segment, `None` for a top-level path.
    pub fn parent(&self) -> Option<FieldPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(FieldPath {
            segments: self.segments[..self.segments.len() - 1].iter().cloned().collect(),
        })
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: &str) -> StoreResult<FieldPath> {
        let mut segments: Vec<&str> = self.segments.iter().map(|s| s.as_str()).collect();
        segments.push(segment);
        FieldPath::new(&segments)
    }

    /// Checks if `other` is this path or a field nested under it.
    pub fn is_prefix_of(&self, other: &FieldPath) -> bool {
        self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| a == b)
    }

    /// Two paths overlap when one addresses the other or a parent of it.
    pub fn overlaps(&self, other: &FieldPath) -> bool {
        self.is_prefix_of(other) || other.is_prefix_of(self)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.iter().join(FIELD_SEPARATOR))
    }
}

/// Builds a [FieldPath] from its segments.
pub fn field<S: AsRef<str>>(segments: &[S]) -> StoreResult<FieldPath> {
    FieldPath::new(segments)
}
