//! Comparison operators and their query-key suffixes.
//!
//! The [`Op`] enum names the operators a query parameter can select. A
//! parameter key is a field name optionally followed by `_<op>`; a bare field
//! name means [`Op::Eq`].

use std::cmp::Ordering;

/// Comparison operator selected by a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Equal. The default when a key has no suffix.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Membership in a comma-separated list.
    In,
    /// Substring of a string field, or element of a sequence field.
    Contains,
    /// Inclusive range given as `min,max`.
    Between,
}

/// Suffixes are tried in this order so `_gte` is never read as `_gt`.
const SUFFIX_ORDER: [Op; 8] = [
    Op::Between,
    Op::Contains,
    Op::Gte,
    Op::Gt,
    Op::Lte,
    Op::Lt,
    Op::Ne,
    Op::In,
];

impl Op {
    /// Splits a parameter key into its field name and operator.
    ///
    /// ```
    /// use sift::Op;
    ///
    /// assert_eq!(Op::split_key("age_gte"), ("age", Op::Gte));
    /// assert_eq!(Op::split_key("name"), ("name", Op::Eq));
    /// ```
    pub fn split_key(key: &str) -> (&str, Op) {
        for op in SUFFIX_ORDER {
            if let Some(field) = key
                .strip_suffix(op.as_str())
                .and_then(|rest| rest.strip_suffix('_'))
            {
                if !field.is_empty() {
                    return (field, op);
                }
            }
        }
        (key, Op::Eq)
    }

    /// Evaluates a comparison given an ordering result.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the suffix name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::In => "in",
            Op::Contains => "contains",
            Op::Between => "between",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
