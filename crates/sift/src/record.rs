//! Traits that expose struct fields to the engine.
//!
//! [`Record`] is implemented by `#[derive(Record)]` for structs that should be
//! filterable, and can be written by hand for anything else. [`FieldValue`]
//! turns a single field into a [`Value`], and [`FieldKind`] reports the
//! declared shape of a field type so raw query text can be coerced into it.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};

use crate::compare;
use crate::registry::FieldDescriptor;
use crate::value::{Kind, Number, Value};

/// A struct whose fields can be read by name at evaluation time.
///
/// # Derive Usage
///
/// ```
/// use sift::{Predicate, Record};
///
/// #[derive(Record)]
/// struct Task {
///     #[query(filterable, sortable)]
///     name: String,
///     #[query(filterable)]
///     priority: u8,
///     done: bool,
/// }
///
/// let tasks = vec![
///     Task { name: "Write docs".into(), priority: 3, done: false },
///     Task { name: "Fix bug".into(), priority: 5, done: true },
/// ];
///
/// let urgent = Predicate::gte(Task::PRIORITY, 4u8);
/// assert_eq!(urgent.filter(&tasks).len(), 1);
/// ```
///
/// # Manual Implementation
///
/// ```
/// use sift::{FieldValue, Record, Value};
///
/// struct Task {
///     name: String,
///     priority: u8,
/// }
///
/// impl Record for Task {
///     fn field(&self, name: &str) -> Option<Value<'_>> {
///         match name {
///             "name" => Some(self.name.to_value()),
///             "priority" => Some(self.priority.to_value()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of the named field, or `None` if no such field is exposed.
    fn field(&self, name: &str) -> Option<Value<'_>>;

    /// Returns the annotated fields of this type for the query registry.
    fn descriptors() -> Vec<FieldDescriptor>
    where
        Self: Sized,
    {
        Vec::new()
    }

    /// Returns `true` when every exposed field holds its zero value.
    fn is_zero(&self) -> bool {
        false
    }
}

/// A type that can be presented to the engine as a [`Value`].
pub trait FieldValue {
    fn to_value(&self) -> Value<'_>;
}

/// A type with a statically known [`Kind`].
pub trait FieldKind {
    fn kind() -> Kind;
}

/// An ordered collection of field values.
pub trait Sequence {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Element at `index`.
    fn get(&self, index: usize) -> Option<Value<'_>>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'s> dyn Sequence + 's {
    /// Iterates the elements in order.
    pub fn iter(&self) -> impl Iterator<Item = Value<'_>> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

/// A key/value collection of field values.
pub trait Mapping {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Iterates all entries. Order is unspecified.
    fn entries(&self) -> Box<dyn Iterator<Item = (Value<'_>, Value<'_>)> + '_>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'m> dyn Mapping + 'm {
    /// Finds the value stored under a key equal to `key`.
    ///
    /// Keys are matched with the engine's value equality, so an `i64` operand
    /// finds a `u16` key of the same value.
    pub fn lookup(&self, key: &Value<'_>) -> Option<Value<'_>> {
        self.entries()
            .find(|(k, _)| compare::equals(k, key) == Some(true))
            .map(|(_, v)| v)
    }
}

macro_rules! numeric_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn to_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }

            impl FieldKind for $ty {
                fn kind() -> Kind {
                    Kind::$kind
                }
            }
        )*
    };
}

numeric_field! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => U64,
    f32 => F32, f64 => F64,
}

impl FieldValue for String {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl FieldKind for String {
    fn kind() -> Kind {
        Kind::String
    }
}

impl FieldValue for str {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl FieldKind for str {
    fn kind() -> Kind {
        Kind::String
    }
}

impl FieldValue for &str {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl FieldKind for &str {
    fn kind() -> Kind {
        Kind::String
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl FieldKind for bool {
    fn kind() -> Kind {
        Kind::Bool
    }
}

impl FieldValue for DateTime<Utc> {
    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

impl FieldKind for DateTime<Utc> {
    fn kind() -> Kind {
        Kind::Timestamp
    }
}

impl FieldValue for DateTime<FixedOffset> {
    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(self.with_timezone(&Utc))
    }
}

impl FieldKind for DateTime<FixedOffset> {
    fn kind() -> Kind {
        Kind::Timestamp
    }
}

/// Dates read as midnight UTC.
impl FieldValue for NaiveDate {
    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(self.and_time(NaiveTime::MIN).and_utc())
    }
}

impl FieldKind for NaiveDate {
    fn kind() -> Kind {
        Kind::Timestamp
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value<'_> {
        Value::Optional(self.as_ref().map(|inner| inner as &dyn FieldValue))
    }
}

impl<T: FieldKind> FieldKind for Option<T> {
    fn kind() -> Kind {
        Kind::Optional(Box::new(T::kind()))
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: FieldKind> FieldKind for Box<T> {
    fn kind() -> Kind {
        T::kind()
    }
}

impl<T: FieldValue> Sequence for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<Value<'_>> {
        self.as_slice().get(index).map(FieldValue::to_value)
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_value(&self) -> Value<'_> {
        Value::Sequence(self)
    }
}

impl<T: FieldKind> FieldKind for Vec<T> {
    fn kind() -> Kind {
        Kind::Sequence(Box::new(T::kind()))
    }
}

impl<T: FieldValue, const N: usize> Sequence for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<Value<'_>> {
        self.as_slice().get(index).map(FieldValue::to_value)
    }
}

impl<T: FieldValue, const N: usize> FieldValue for [T; N] {
    fn to_value(&self) -> Value<'_> {
        Value::Sequence(self)
    }
}

impl<T: FieldKind, const N: usize> FieldKind for [T; N] {
    fn kind() -> Kind {
        Kind::Sequence(Box::new(T::kind()))
    }
}

impl<K: FieldValue, V: FieldValue, S> Mapping for HashMap<K, V, S> {
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (Value<'_>, Value<'_>)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.to_value(), v.to_value())))
    }
}

impl<K: FieldValue, V: FieldValue, S> FieldValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value<'_> {
        Value::Mapping(self)
    }
}

impl<K, V, S> FieldKind for HashMap<K, V, S> {
    fn kind() -> Kind {
        Kind::Mapping
    }
}

impl<K: FieldValue, V: FieldValue> Mapping for BTreeMap<K, V> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (Value<'_>, Value<'_>)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.to_value(), v.to_value())))
    }
}

impl<K: FieldValue, V: FieldValue> FieldValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value<'_> {
        Value::Mapping(self)
    }
}

impl<K, V> FieldKind for BTreeMap<K, V> {
    fn kind() -> Kind {
        Kind::Mapping
    }
}
