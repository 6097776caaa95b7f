//! Path identifiers for addressing nodes in a [`Store`](crate::Store).
//!
//! A path identifier is a plain string of dot-separated segments, with the
//! empty string denoting the root. Everything in this module is a pure
//! function over such strings.
//!
//! Two kinds of segment carry extra meaning:
//!
//! - **Index segments** look numeric. Three notations are recognized and kept
//!   verbatim, but ordered by numeric value: plain digits (`12`), brackets
//!   (`[12]`) and an underscore prefix (`_12`).
//! - **Arity variants** carry a `$<digits>` suffix on the leaf (`a$2`). They
//!   are ordered by length first, so `a$2` sorts before `a$10`.
//!
//! # Usage
//!
//! ```rust
//! use electrum_store::path;
//!
//! let id = path::join(["todos", "3"])?;
//! assert_eq!(id, "todos.3");
//! assert_eq!(path::parent_id(&id), Some("todos"));
//! assert_eq!(path::leaf_id(id.as_str()), Some("3"));
//! assert_eq!(path::parse_index("[3]"), Some(3));
//! # Ok::<(), electrum_store::path::PathError>(())
//! ```

use std::{borrow::Cow, cmp::Ordering, fmt};

use thiserror::Error;

use crate::constants::{ARITY_MARKER, MAX_SAFE_INTEGER, ROOT_ID, SEPARATOR, WILDCARD};

/// Error type for malformed path parts and identifiers.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A part or identifier does not have an acceptable shape.
    #[error("Invalid path argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },
}

impl PathError {
    fn invalid(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        PathError::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, PathError::InvalidArgument { .. })
    }
}

/// A single path segment supplied by a caller.
///
/// Entity navigation accepts either a named segment or a non-negative index.
/// Conversions exist from strings and unsigned integers; signed integers go
/// through [`TryFrom<i64>`] so negative indices are rejected up front.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Part {
    Name(String),
    Index(u64),
}

impl Part {
    /// The segment as it appears inside a path identifier.
    pub fn as_segment(&self) -> Cow<'_, str> {
        match self {
            Part::Name(name) => Cow::Borrowed(name),
            Part::Index(index) => Cow::Owned(index.to_string()),
        }
    }

    /// Whether this part refers to the node it is resolved against.
    ///
    /// The empty name and the wildcard `"*"` both mean "self".
    pub fn is_self(&self) -> bool {
        matches!(self, Part::Name(name) if name.is_empty() || name == WILDCARD)
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_segment())
    }
}

impl From<&str> for Part {
    fn from(name: &str) -> Self {
        Part::Name(name.to_owned())
    }
}

impl From<String> for Part {
    fn from(name: String) -> Self {
        Part::Name(name)
    }
}

impl From<&String> for Part {
    fn from(name: &String) -> Self {
        Part::Name(name.clone())
    }
}

impl From<u64> for Part {
    fn from(index: u64) -> Self {
        Part::Index(index)
    }
}

impl From<u32> for Part {
    fn from(index: u32) -> Self {
        Part::Index(u64::from(index))
    }
}

impl From<usize> for Part {
    fn from(index: usize) -> Self {
        Part::Index(u64::try_from(index).unwrap_or(u64::MAX))
    }
}

impl TryFrom<i64> for Part {
    type Error = PathError;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        u64::try_from(index)
            .map(Part::Index)
            .map_err(|_| PathError::invalid(index.to_string(), "negative indices are not allowed"))
    }
}

impl TryFrom<i32> for Part {
    type Error = PathError;

    fn try_from(index: i32) -> Result<Self, Self::Error> {
        Part::try_from(i64::from(index))
    }
}

/// Joins parts into a path identifier.
///
/// Every part must render to a non-empty segment, and at least one part must
/// be given.
pub fn join<I, P>(parts: I) -> Result<String, PathError>
where
    I: IntoIterator<Item = P>,
    P: Into<Part>,
{
    let mut id = String::new();
    let mut count = 0usize;
    for part in parts {
        let part = part.into();
        let segment = part.as_segment();
        if segment.is_empty() {
            return Err(PathError::invalid(
                id.clone(),
                format!("part {count} of the path is empty"),
            ));
        }
        if count > 0 {
            id.push(SEPARATOR);
        }
        id.push_str(&segment);
        count += 1;
    }
    if count == 0 {
        return Err(PathError::invalid("", "expects at least one path part"));
    }
    Ok(id)
}

/// Composes the identifier of a direct child without validation.
///
/// The root contributes no prefix, so `child_id("", "a")` is `"a"`.
pub fn child_id(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_owned()
    } else {
        let mut id = String::with_capacity(parent.len() + segment.len() + 1);
        id.push_str(parent);
        id.push(SEPARATOR);
        id.push_str(segment);
        id
    }
}

/// Returns the last segment of `id`.
///
/// `None` in means `None` out; callers use it as the "no id" sentinel.
pub fn leaf_id<'a>(id: impl Into<Option<&'a str>>) -> Option<&'a str> {
    let id = id.into()?;
    Some(match id.rfind(SEPARATOR) {
        Some(pos) => &id[pos + 1..],
        None => id,
    })
}

/// Returns everything before the last segment of `id`.
///
/// A single-segment id has the root as parent; the root has no parent.
pub fn parent_id(id: &str) -> Option<&str> {
    if id.is_empty() {
        return None;
    }
    Some(match id.rfind(SEPARATOR) {
        Some(pos) => &id[..pos],
        None => ROOT_ID,
    })
}

/// Finds the nearest ancestor-or-self whose last segment equals `part`.
///
/// Segments are scanned from the leaf toward the root and compared as
/// strings, so `Part::Index(2)` matches a segment `2` but not `[2]`. The empty
/// name resolves to the root.
pub fn ancestor_id(id: &str, part: impl Into<Part>) -> Result<Option<&str>, PathError> {
    let part = part.into();
    let segment = part.as_segment();
    if segment.contains(SEPARATOR) {
        return Err(PathError::invalid(&*segment, "cannot be a path specification"));
    }
    if segment.is_empty() {
        return Ok(Some(ROOT_ID));
    }

    let mut end = id.len();
    loop {
        let start = id[..end].rfind(SEPARATOR).map_or(0, |pos| pos + 1);
        if id[start..end] == *segment {
            return Ok(Some(&id[..end]));
        }
        if start == 0 {
            return Ok(None);
        }
        end = start - 1;
    }
}

/// Extracts the arity number of the leaf segment (`a.b$23` is `23`).
pub fn arity_index(id: &str) -> Option<u64> {
    let leaf = leaf_id(id)?;
    let marker = leaf.find(ARITY_MARKER)?;
    parse_positive_int(&leaf[marker + ARITY_MARKER.len_utf8()..])
}

/// Parses a string made only of ASCII digits.
///
/// Values beyond [`MAX_SAFE_INTEGER`] are rejected.
pub fn parse_positive_int(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u64>()
        .ok()
        .filter(|value| *value <= MAX_SAFE_INTEGER)
}

/// Parses an index segment in any of the accepted notations.
pub fn parse_index(segment: &str) -> Option<u64> {
    let digits = if let Some(inner) = segment
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        inner
    } else if let Some(rest) = segment.strip_prefix('_') {
        rest
    } else {
        segment
    };
    parse_positive_int(digits)
}

/// Whether `segment` is an index in one of the accepted notations.
pub fn is_index(segment: &str) -> bool {
    parse_index(segment).is_some()
}

/// Orders index segments by numeric value, then by notation.
///
/// Non-index segments sort after every index.
pub fn compare_index_keys(a: &str, b: &str) -> Ordering {
    match (parse_index(a), parse_index(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Orders arity variants by length, then lexicographically.
pub fn compare_arity_keys(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Checks that `id` is usable as a node identifier.
///
/// The root id is always valid. Any other id must not contain empty segments.
pub fn validate_id(id: &str) -> Result<(), PathError> {
    if id.is_empty() {
        return Ok(());
    }
    if id.split(SEPARATOR).any(str::is_empty) {
        return Err(PathError::invalid(id, "path segments cannot be empty"));
    }
    Ok(())
}

/// Returns the leaf of `id` when it is a direct child of `parent`.
pub fn child_leaf<'a>(id: &'a str, parent: &str) -> Option<&'a str> {
    let rest = if parent.is_empty() {
        if id.is_empty() {
            return None;
        }
        id
    } else {
        id.strip_prefix(parent)?.strip_prefix(SEPARATOR)?
    };
    if rest.contains(SEPARATOR) {
        None
    } else {
        Some(rest)
    }
}

/// Whether `id` lies strictly below `ancestor`.
pub fn is_descendant_of(id: &str, ancestor: &str) -> bool {
    if ancestor.is_empty() {
        return !id.is_empty();
    }
    id.strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with(SEPARATOR))
}
