//! Ordering types and the stable sort over records.
//!
//! Provides [`Dir`] for sort direction, [`OrderBy`] for field-based ordering,
//! and [`sort`], which never panics whatever the field values are.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::compare::compare;
use crate::path::{resolve, FieldPath};
use crate::record::Record;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A field and a direction to sort by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: FieldPath,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<FieldPath>) -> Self {
        OrderBy {
            field: field.into(),
            dir: Dir::Asc,
        }
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<FieldPath>) -> Self {
        OrderBy {
            field: field.into(),
            dir: Dir::Desc,
        }
    }

    /// Creates a new ordering with the given direction.
    pub fn new(field: impl Into<FieldPath>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Reads a sort parameter: `name` is ascending, `-name` descending.
    ///
    /// ```
    /// use sift::{Dir, OrderBy};
    ///
    /// let order = OrderBy::parse("-created_at");
    /// assert_eq!(order.dir, Dir::Desc);
    /// assert_eq!(order.field.to_string(), "created_at");
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('-') {
            Some(field) => OrderBy::desc(field),
            None => OrderBy::asc(raw),
        }
    }
}

/// A resolved sort key. `None` holds values with no ordering.
type SortKey<'a> = Option<Value<'a>>;

fn sort_key<'a, T: Record>(item: &'a T, field: &FieldPath) -> SortKey<'a> {
    let value = resolve(item, field).ok()?.dereference()?;
    match value {
        Value::Number(n) if n.is_nan() => None,
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Timestamp(_) => Some(value),
        _ => None,
    }
}

fn kind_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::String(_) => 0,
        Value::Number(_) => 1,
        Value::Bool(_) => 2,
        _ => 3,
    }
}

/// Orders two keys. Keys without an ordering go last in either direction.
fn compare_keys(a: &SortKey<'_>, b: &SortKey<'_>, dir: Dir) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ordering = match kind_rank(a).cmp(&kind_rank(b)) {
                Ordering::Equal => compare(a, b).unwrap_or(Ordering::Equal),
                other => other,
            };
            dir.apply(ordering)
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts records by one field.
///
/// The sort is stable. Records whose field cannot be resolved, is null, NaN,
/// or of a kind without ordering are placed after all others, in input order.
pub fn sort<'a, T: Record>(items: impl IntoIterator<Item = &'a T>, order: &OrderBy) -> Vec<&'a T> {
    let mut keyed: Vec<(SortKey<'a>, &'a T)> = items
        .into_iter()
        .map(|item| (sort_key(item, &order.field), item))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, order.dir));
    keyed.into_iter().map(|(_, item)| item).collect()
}
