//! Dotted field paths and their resolution against records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::record::Record;
use crate::value::Value;

/// A parsed dotted field path such as `address.city`.
///
/// Parse once and reuse: resolution walks the pre-split segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Splits a dotted path into segments.
    pub fn parse(path: &str) -> Self {
        FieldPath {
            segments: path.split('.').map(str::to_owned).collect(),
        }
    }

    /// Returns the individual segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the last segment.
    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        FieldPath::parse(path)
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        FieldPath::parse(&path)
    }
}

impl From<&String> for FieldPath {
    fn from(path: &String) -> Self {
        FieldPath::parse(path)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}

/// Resolves a path against a record.
///
/// Optional references met before the last segment are followed; a null one
/// fails with [`FieldError::NilReference`]. The final value is returned as
/// stored, so a trailing optional comes back as [`Value::Optional`].
pub fn resolve<'a, R>(record: &'a R, path: &FieldPath) -> Result<Value<'a>, FieldError>
where
    R: Record + ?Sized,
{
    let mut segments = path.segments().iter();
    let Some(first) = segments.next() else {
        return Err(FieldError::NotFound {
            segment: String::new(),
        });
    };

    let mut current = record.field(first).ok_or_else(|| FieldError::NotFound {
        segment: first.clone(),
    })?;
    let mut previous = first;

    for segment in segments {
        let composite = current.dereference().ok_or_else(|| FieldError::NilReference {
            segment: previous.clone(),
        })?;
        current = match composite {
            Value::Record(inner) => inner.field(segment).ok_or_else(|| FieldError::NotFound {
                segment: segment.clone(),
            })?,
            other => {
                return Err(FieldError::NotComposite {
                    segment: previous.clone(),
                    kind: other.kind_name(),
                })
            }
        };
        previous = segment;
    }

    Ok(current)
}
