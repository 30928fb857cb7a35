//! Field clauses: a path paired with a condition.

use crate::condition::Condition;
use crate::path::{resolve, FieldPath};
use crate::record::Record;

/// A single filter on one field of a record.
///
/// # Example
///
/// ```
/// use sift::{Clause, Condition, Op};
///
/// let clause = Clause::new("address.city", Condition::Compare(Op::Eq, "Lisbon".into()));
/// assert_eq!(clause.path.to_string(), "address.city");
/// ```
#[derive(Debug, Clone)]
pub struct Clause {
    /// The field to test.
    pub path: FieldPath,
    /// The test applied to the resolved value.
    pub condition: Condition,
}

impl Clause {
    /// Creates a new clause.
    pub fn new(path: impl Into<FieldPath>, condition: Condition) -> Self {
        Clause {
            path: path.into(),
            condition,
        }
    }

    /// Resolves the path on `record` and tests the value.
    ///
    /// A path that cannot be resolved never matches.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match resolve(record, &self.path) {
            Ok(value) => self.condition.test(&value),
            Err(err) => {
                tracing::trace!(path = %self.path, error = %err, "field did not resolve");
                false
            }
        }
    }
}
