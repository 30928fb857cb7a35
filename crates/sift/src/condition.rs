//! Leaf conditions evaluated against a single resolved field value.
//!
//! A [`Condition`] never fails: a value of the wrong kind, a null, or an
//! incomparable operand all make it evaluate to `false`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::compare::{compare, equals};
use crate::date;
use crate::op::Op;
use crate::operand::Operand;
use crate::record::{FieldValue, Mapping};
use crate::value::Value;

/// How a string operand is matched against a string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchMode {
    /// Whole string equality.
    #[default]
    Exact,
    /// Operand occurs anywhere in the field.
    Contains,
    /// Field starts with the operand.
    Prefix,
    /// Field ends with the operand.
    Suffix,
}

/// Options for [`Condition::Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MatchOptions {
    pub mode: MatchMode,
    pub ignore_case: bool,
}

impl MatchOptions {
    pub fn new(mode: MatchMode) -> Self {
        MatchOptions {
            mode,
            ignore_case: false,
        }
    }

    /// Compares case-insensitively.
    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }
}

/// A test applied to each element of a sequence field.
#[derive(Clone)]
pub struct ElementTest(Arc<dyn Fn(&Value<'_>) -> bool + Send + Sync>);

impl ElementTest {
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&Value<'_>) -> bool + Send + Sync + 'static,
    {
        ElementTest(Arc::new(test))
    }

    pub fn test(&self, value: &Value<'_>) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for ElementTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ElementTest(..)")
    }
}

/// A test on one field value.
#[derive(Debug, Clone)]
pub enum Condition {
    /// `Eq`, `Ne`, `Gt`, `Gte`, `Lt` or `Lte` against an operand.
    Compare(Op, Operand),
    /// Equal to any listed operand.
    In(Vec<Operand>),
    /// Substring of a string field, or equal to an element of a sequence field.
    Contains(Operand),
    /// String match with a mode and optional case folding.
    Text { value: String, options: MatchOptions },
    /// Regular expression search. `None` holds a pattern that failed to compile.
    Regex(Option<Regex>),
    IsNil,
    IsNotNil,
    IsZero,
    IsNotZero,
    /// Strictly earlier than, for timestamps and date strings.
    Before(DateTime<Utc>),
    /// Strictly later than, for timestamps and date strings.
    After(DateTime<Utc>),
    SequenceContains { value: Operand, ignore_case: bool },
    SequenceContainsAny(Vec<Operand>),
    SequenceContainsAll(Vec<Operand>),
    /// At least one element passes.
    AnyElement(ElementTest),
    /// Every element passes, and there is at least one.
    AllElements(ElementTest),
    HasKey(Operand),
    HasValue(Operand),
    KeyValueEquals(Operand, Operand),
    ContainsAllEntries(Vec<(Operand, Operand)>),
    ContainsAnyEntry(Vec<(Operand, Operand)>),
    SizeEquals(usize),
    SizeGreaterThan(usize),
    SizeLessThan(usize),
}

impl Condition {
    /// Compiles a regex condition. An invalid pattern yields a condition that never matches.
    pub fn regex(pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => Condition::Regex(Some(regex)),
            Err(err) => {
                tracing::debug!(pattern, error = %err, "invalid regex pattern, condition never matches");
                Condition::Regex(None)
            }
        }
    }

    /// Evaluates the condition against a resolved field value.
    pub fn test(&self, value: &Value<'_>) -> bool {
        match self {
            Condition::IsNil => value.is_null(),
            Condition::IsNotNil => !value.is_null(),
            Condition::IsZero => value.is_zero(),
            Condition::IsNotZero => !value.is_zero(),
            Condition::Compare(op, operand) => {
                let operand = operand.to_value();
                match op {
                    Op::Eq => equals(value, &operand) == Some(true),
                    Op::Ne => equals(value, &operand) == Some(false),
                    _ => compare(value, &operand).is_some_and(|ord| op.eval_ordering(ord)),
                }
            }
            Condition::In(candidates) => candidates
                .iter()
                .any(|candidate| equals(value, &candidate.to_value()) == Some(true)),
            _ => match value.dereference() {
                Some(concrete) => self.test_concrete(&concrete),
                None => false,
            },
        }
    }

    fn test_concrete(&self, value: &Value<'_>) -> bool {
        match self {
            Condition::Contains(operand) => match (value, operand) {
                (Value::String(field), Operand::String(needle)) => field.contains(needle.as_str()),
                (Value::Sequence(items), _) => {
                    let needle = operand.to_value();
                    items.iter().any(|item| equals(&item, &needle) == Some(true))
                }
                _ => false,
            },
            Condition::Text { value: needle, options } => match value {
                Value::String(field) => text_matches(field, needle, *options),
                _ => false,
            },
            Condition::Regex(regex) => match (regex, value) {
                (Some(regex), Value::String(field)) => regex.is_match(field),
                _ => false,
            },
            Condition::Before(bound) => field_timestamp(value).is_some_and(|t| t < *bound),
            Condition::After(bound) => field_timestamp(value).is_some_and(|t| t > *bound),
            Condition::SequenceContains {
                value: needle,
                ignore_case,
            } => match value {
                Value::Sequence(items) => {
                    items.iter().any(|item| element_equals(&item, needle, *ignore_case))
                }
                _ => false,
            },
            Condition::SequenceContainsAny(needles) => match value {
                Value::Sequence(items) => needles.iter().any(|needle| {
                    items.iter().any(|item| element_equals(&item, needle, false))
                }),
                _ => false,
            },
            Condition::SequenceContainsAll(needles) => match value {
                Value::Sequence(items) => needles.iter().all(|needle| {
                    items.iter().any(|item| element_equals(&item, needle, false))
                }),
                _ => false,
            },
            Condition::AnyElement(element) => match value {
                Value::Sequence(items) => items.iter().any(|item| element.test(&item)),
                _ => false,
            },
            Condition::AllElements(element) => match value {
                Value::Sequence(items) => {
                    !items.is_empty() && items.iter().all(|item| element.test(&item))
                }
                _ => false,
            },
            Condition::HasKey(key) => match value {
                Value::Mapping(map) => map.lookup(&key.to_value()).is_some(),
                _ => false,
            },
            Condition::HasValue(needle) => match value {
                Value::Mapping(map) => {
                    let needle = needle.to_value();
                    map.entries().any(|(_, v)| equals(&v, &needle) == Some(true))
                }
                _ => false,
            },
            Condition::KeyValueEquals(key, expected) => match value {
                Value::Mapping(map) => entry_matches(*map, key, expected),
                _ => false,
            },
            Condition::ContainsAllEntries(pairs) => match value {
                Value::Mapping(map) => pairs.iter().all(|(k, v)| entry_matches(*map, k, v)),
                _ => false,
            },
            Condition::ContainsAnyEntry(pairs) => match value {
                Value::Mapping(map) => pairs.iter().any(|(k, v)| entry_matches(*map, k, v)),
                _ => false,
            },
            Condition::SizeEquals(size) => value.as_mapping().is_some_and(|m| m.len() == *size),
            Condition::SizeGreaterThan(size) => value.as_mapping().is_some_and(|m| m.len() > *size),
            Condition::SizeLessThan(size) => value.as_mapping().is_some_and(|m| m.len() < *size),
            Condition::IsNil
            | Condition::IsNotNil
            | Condition::IsZero
            | Condition::IsNotZero
            | Condition::Compare(..)
            | Condition::In(_) => self.test(value),
        }
    }
}

fn text_matches(field: &str, needle: &str, options: MatchOptions) -> bool {
    if options.ignore_case {
        let field = field.to_lowercase();
        let needle = needle.to_lowercase();
        return text_matches(&field, &needle, MatchOptions::new(options.mode));
    }
    match options.mode {
        MatchMode::Exact => field == needle,
        MatchMode::Contains => field.contains(needle),
        MatchMode::Prefix => field.starts_with(needle),
        MatchMode::Suffix => field.ends_with(needle),
    }
}

fn field_timestamp(value: &Value<'_>) -> Option<DateTime<Utc>> {
    match value {
        Value::Timestamp(t) => Some(*t),
        Value::String(s) => date::parse_date(s),
        _ => None,
    }
}

fn element_equals(item: &Value<'_>, needle: &Operand, ignore_case: bool) -> bool {
    if ignore_case {
        if let (Some(item), Operand::String(needle)) = (item.as_str(), needle) {
            return item.to_lowercase() == needle.to_lowercase();
        }
    }
    equals(item, &needle.to_value()) == Some(true)
}

fn entry_matches(map: &dyn Mapping, key: &Operand, expected: &Operand) -> bool {
    map.lookup(&key.to_value())
        .is_some_and(|found| equals(&found, &expected.to_value()) == Some(true))
}
