//! Composable predicates over records.
//!
//! Every operator, geographic filter, combinator and custom closure is a
//! [`Predicate`], so they nest freely. Evaluation is pure and never fails:
//! anything that cannot be evaluated is `false`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::clause::Clause;
use crate::condition::{Condition, ElementTest, MatchMode, MatchOptions};
use crate::geo::{Area, BoundingBox, Coordinates, GeoClause, Point};
use crate::op::Op;
use crate::operand::Operand;
use crate::path::FieldPath;
use crate::record::Record;
use crate::value::Value;

/// A boolean test on a record of type `T`.
///
/// # Example
///
/// ```
/// use sift::{FieldValue, Predicate, Record, Value};
///
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// impl Record for User {
///     fn field(&self, name: &str) -> Option<Value<'_>> {
///         match name {
///             "name" => Some(self.name.to_value()),
///             "age" => Some(self.age.to_value()),
///             _ => None,
///         }
///     }
/// }
///
/// let users = vec![
///     User { name: "Alice".into(), age: 25 },
///     User { name: "Bob".into(), age: 17 },
/// ];
///
/// let adults = Predicate::and(vec![
///     Predicate::gte("age", 18u32),
///     Predicate::not(Predicate::eq("name", "Mallory")),
/// ]);
/// let found = adults.filter(&users);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].name, "Alice");
/// ```
pub enum Predicate<T> {
    /// A condition on one field.
    Field(Clause),
    /// A geographic test on a pair of coordinate fields.
    Geo(GeoClause),
    /// All children match. Empty is `true`.
    And(Vec<Predicate<T>>),
    /// At least one child matches. Empty is `false`.
    Or(Vec<Predicate<T>>),
    Not(Box<Predicate<T>>),
    /// A caller-supplied test.
    Custom(Arc<dyn Fn(&T) -> bool + Send + Sync>),
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        match self {
            Predicate::Field(clause) => Predicate::Field(clause.clone()),
            Predicate::Geo(geo) => Predicate::Geo(geo.clone()),
            Predicate::And(children) => Predicate::And(children.clone()),
            Predicate::Or(children) => Predicate::Or(children.clone()),
            Predicate::Not(inner) => Predicate::Not(inner.clone()),
            Predicate::Custom(test) => Predicate::Custom(Arc::clone(test)),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Field(clause) => f.debug_tuple("Field").field(clause).finish(),
            Predicate::Geo(geo) => f.debug_tuple("Geo").field(geo).finish(),
            Predicate::And(children) => f.debug_tuple("And").field(children).finish(),
            Predicate::Or(children) => f.debug_tuple("Or").field(children).finish(),
            Predicate::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Predicate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// ============================================================================
// Construction
// ============================================================================

impl<T> Predicate<T> {
    fn field(path: impl Into<FieldPath>, condition: Condition) -> Self {
        Predicate::Field(Clause::new(path, condition))
    }

    fn compare(path: impl Into<FieldPath>, op: Op, value: impl Into<Operand>) -> Self {
        Self::field(path, Condition::Compare(op, value.into()))
    }

    pub fn eq(path: impl Into<FieldPath>, value: impl Into<Operand>) -> Self {
        Self::compare(path, Op::Eq, value)
    }

    pub fn ne(path: impl Into<FieldPath>, value: impl Into<Operand>) -> Self {
        Self::compare(path, Op::Ne, value)
    }

    pub fn gt(path: impl Into<FieldPath>, value: impl Into<Operand>) -> Self {
        Self::compare(path, Op::Gt, value)
    }

    pub fn gte(path: impl Into<FieldPath>, value: impl Into<Operand>) -> Self {
        Self::compare(path, Op::Gte, value)
    }

    pub fn lt(path: impl Into<FieldPath>, value: impl Into<Operand>) -> Self {
        Self::compare(path, Op::Lt, value)
    }

    pub fn lte(path: impl Into<FieldPath>, value: impl Into<Operand>) -> Self {
        Self::compare(path, Op::Lte, value)
    }

    /// Field equals any of `values`.
    pub fn is_in<V: Into<Operand>>(path: impl Into<FieldPath>, values: impl IntoIterator<Item = V>) -> Self {
        Self::field(path, Condition::In(values.into_iter().map(Into::into).collect()))
    }

    /// Inclusive range, equivalent to `gte(min) AND lte(max)`.
    pub fn between(path: impl Into<FieldPath>, min: impl Into<Operand>, max: impl Into<Operand>) -> Self {
        let path = path.into();
        Predicate::And(vec![
            Self::gte(path.clone(), min),
            Self::lte(path, max),
        ])
    }

    /// Substring of a string field, or element of a sequence field.
    pub fn contains(path: impl Into<FieldPath>, value: impl Into<Operand>) -> Self {
        Self::field(path, Condition::Contains(value.into()))
    }

    /// String match with explicit mode and case handling.
    pub fn text(path: impl Into<FieldPath>, value: impl Into<String>, options: MatchOptions) -> Self {
        Self::field(
            path,
            Condition::Text {
                value: value.into(),
                options,
            },
        )
    }

    pub fn starts_with(path: impl Into<FieldPath>, prefix: impl Into<String>) -> Self {
        Self::text(path, prefix, MatchOptions::new(MatchMode::Prefix))
    }

    pub fn ends_with(path: impl Into<FieldPath>, suffix: impl Into<String>) -> Self {
        Self::text(path, suffix, MatchOptions::new(MatchMode::Suffix))
    }

    /// Case-insensitive whole-string equality.
    pub fn eq_ignore_case(path: impl Into<FieldPath>, value: impl Into<String>) -> Self {
        Self::text(path, value, MatchOptions::new(MatchMode::Exact).ignore_case())
    }

    /// Regex search on a string field. An invalid pattern never matches.
    pub fn regex(path: impl Into<FieldPath>, pattern: &str) -> Self {
        Self::field(path, Condition::regex(pattern))
    }

    pub fn is_nil(path: impl Into<FieldPath>) -> Self {
        Self::field(path, Condition::IsNil)
    }

    /// Field resolves and is not null. Unresolvable paths do not match.
    pub fn is_not_nil(path: impl Into<FieldPath>) -> Self {
        Self::field(path, Condition::IsNotNil)
    }

    pub fn is_zero(path: impl Into<FieldPath>) -> Self {
        Self::field(path, Condition::IsZero)
    }

    /// Field resolves and is not zero. Unresolvable paths do not match.
    pub fn is_not_zero(path: impl Into<FieldPath>) -> Self {
        Self::field(path, Condition::IsNotZero)
    }

    /// Strictly earlier than `bound`. Works on timestamps and date strings.
    pub fn date_before(path: impl Into<FieldPath>, bound: DateTime<Utc>) -> Self {
        Self::field(path, Condition::Before(bound))
    }

    /// Strictly later than `bound`. Works on timestamps and date strings.
    pub fn date_after(path: impl Into<FieldPath>, bound: DateTime<Utc>) -> Self {
        Self::field(path, Condition::After(bound))
    }

    /// Between `start` and `end`, widened by one second on each side.
    pub fn date_between(path: impl Into<FieldPath>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let path = path.into();
        let second = TimeDelta::seconds(1);
        Predicate::And(vec![
            Self::date_after(path.clone(), start - second),
            Self::date_before(path, end + second),
        ])
    }

    pub fn array_contains(path: impl Into<FieldPath>, value: impl Into<Operand>) -> Self {
        Self::field(
            path,
            Condition::SequenceContains {
                value: value.into(),
                ignore_case: false,
            },
        )
    }

    pub fn array_contains_ignore_case(path: impl Into<FieldPath>, value: impl Into<String>) -> Self {
        Self::field(
            path,
            Condition::SequenceContains {
                value: Operand::String(value.into()),
                ignore_case: true,
            },
        )
    }

    /// At least one of `values` is an element. Empty `values` never matches.
    pub fn array_contains_any<V: Into<Operand>>(
        path: impl Into<FieldPath>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::field(
            path,
            Condition::SequenceContainsAny(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Every one of `values` is an element. Empty `values` always matches a sequence.
    pub fn array_contains_all<V: Into<Operand>>(
        path: impl Into<FieldPath>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::field(
            path,
            Condition::SequenceContainsAll(values.into_iter().map(Into::into).collect()),
        )
    }

    /// At least one element passes `test`.
    pub fn array_any<F>(path: impl Into<FieldPath>, test: F) -> Self
    where
        F: Fn(&Value<'_>) -> bool + Send + Sync + 'static,
    {
        Self::field(path, Condition::AnyElement(ElementTest::new(test)))
    }

    /// The sequence is non-empty and every element passes `test`.
    pub fn array_all<F>(path: impl Into<FieldPath>, test: F) -> Self
    where
        F: Fn(&Value<'_>) -> bool + Send + Sync + 'static,
    {
        Self::field(path, Condition::AllElements(ElementTest::new(test)))
    }

    pub fn has_key(path: impl Into<FieldPath>, key: impl Into<Operand>) -> Self {
        Self::field(path, Condition::HasKey(key.into()))
    }

    pub fn has_value(path: impl Into<FieldPath>, value: impl Into<Operand>) -> Self {
        Self::field(path, Condition::HasValue(value.into()))
    }

    pub fn key_value_equals(
        path: impl Into<FieldPath>,
        key: impl Into<Operand>,
        value: impl Into<Operand>,
    ) -> Self {
        Self::field(path, Condition::KeyValueEquals(key.into(), value.into()))
    }

    /// Every pair is present with an equal value.
    pub fn map_contains_all<K, V>(path: impl Into<FieldPath>, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Operand>,
        V: Into<Operand>,
    {
        Self::field(path, Condition::ContainsAllEntries(operand_pairs(pairs)))
    }

    /// At least one pair is present with an equal value.
    pub fn map_contains_any<K, V>(path: impl Into<FieldPath>, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Operand>,
        V: Into<Operand>,
    {
        Self::field(path, Condition::ContainsAnyEntry(operand_pairs(pairs)))
    }

    pub fn map_size_equals(path: impl Into<FieldPath>, size: usize) -> Self {
        Self::field(path, Condition::SizeEquals(size))
    }

    pub fn map_size_greater_than(path: impl Into<FieldPath>, size: usize) -> Self {
        Self::field(path, Condition::SizeGreaterThan(size))
    }

    pub fn map_size_less_than(path: impl Into<FieldPath>, size: usize) -> Self {
        Self::field(path, Condition::SizeLessThan(size))
    }

    /// Coordinates lie within `km` of `center`, boundary included.
    pub fn within_radius(coordinates: Coordinates, center: Point, km: f64) -> Self {
        Predicate::Geo(GeoClause {
            coordinates,
            area: Area::Radius { center, km },
        })
    }

    /// Negation of [`within_radius`](Self::within_radius).
    pub fn outside_radius(coordinates: Coordinates, center: Point, km: f64) -> Self {
        Self::not(Self::within_radius(coordinates, center, km))
    }

    pub fn within_bounding_box(coordinates: Coordinates, bbox: BoundingBox) -> Self {
        Predicate::Geo(GeoClause {
            coordinates,
            area: Area::Box(bbox),
        })
    }

    pub fn and(children: Vec<Predicate<T>>) -> Self {
        Predicate::And(children)
    }

    pub fn or(children: Vec<Predicate<T>>) -> Self {
        Predicate::Or(children)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Predicate<T>) -> Self {
        Predicate::Not(Box::new(inner))
    }

    pub fn custom<F>(test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Predicate::Custom(Arc::new(test))
    }
}

fn operand_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Vec<(Operand, Operand)>
where
    K: Into<Operand>,
    V: Into<Operand>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

// ============================================================================
// Evaluation
// ============================================================================

impl<T: Record> Predicate<T> {
    /// Tests a single record.
    pub fn matches(&self, item: &T) -> bool {
        match self {
            Predicate::Field(clause) => clause.matches(item),
            Predicate::Geo(geo) => geo.matches(item),
            Predicate::And(children) => children.iter().all(|child| child.matches(item)),
            Predicate::Or(children) => children.iter().any(|child| child.matches(item)),
            Predicate::Not(inner) => !inner.matches(item),
            Predicate::Custom(test) => test(item),
        }
    }

    /// Returns references to the matching items, in input order.
    pub fn filter<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(item)).collect()
    }

    /// Returns clones of the matching items, in input order.
    pub fn filter_cloned(&self, items: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        items.iter().filter(|item| self.matches(item)).cloned().collect()
    }

    /// Counts the matching items.
    pub fn count(&self, items: &[T]) -> usize {
        items.iter().filter(|item| self.matches(item)).count()
    }

    /// Returns `true` if any item matches.
    pub fn any_match(&self, items: &[T]) -> bool {
        items.iter().any(|item| self.matches(item))
    }
}
