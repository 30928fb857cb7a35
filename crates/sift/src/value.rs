//! Runtime value types for field comparison.
//!
//! A [`Value`] is a borrowed view of one field of a record at evaluation time.
//! Every field a record exposes, however deeply nested, is presented to the
//! engine as one of its variants. [`Kind`] is the static counterpart: the shape
//! a field is declared with, used by the query compiler to coerce raw text.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::record::{FieldValue, Mapping, Record, Sequence};

/// Runtime value of a field, borrowed from the source record.
///
/// # Example
///
/// ```
/// use sift::{FieldValue, Number, Value};
///
/// let age: u8 = 42;
/// assert!(matches!(age.to_value(), Value::Number(Number::U8(42))));
///
/// let nickname: Option<String> = None;
/// assert!(nickname.to_value().is_null());
/// ```
#[derive(Clone, Copy)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value, tagged with its exact width.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Point in time.
    Timestamp(DateTime<Utc>),
    /// Ordered collection of values.
    Sequence(&'a dyn Sequence),
    /// Key/value collection.
    Mapping(&'a dyn Mapping),
    /// Nullable reference. `None` is a null field.
    Optional(Option<&'a dyn FieldValue>),
    /// Nested record whose own fields can be reached with a dotted path.
    Record(&'a dyn Record),
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a null optional.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Optional(None))
    }

    /// Returns `true` if this is a `String` value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if this is a `Number` value.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if this is a `Bool` value.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if this is a `Timestamp` value.
    pub fn is_timestamp(&self) -> bool {
        matches!(self, Value::Timestamp(_))
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the bool value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the sequence, if present.
    pub fn as_sequence(&self) -> Option<&'a dyn Sequence> {
        match self {
            Value::Sequence(s) => Some(*s),
            _ => None,
        }
    }

    /// Extracts the mapping, if present.
    pub fn as_mapping(&self) -> Option<&'a dyn Mapping> {
        match self {
            Value::Mapping(m) => Some(*m),
            _ => None,
        }
    }

    /// Follows optional references until a concrete value is reached.
    ///
    /// Returns `None` when a null is encountered along the way.
    pub fn dereference(self) -> Option<Value<'a>> {
        let mut current = self;
        loop {
            match current {
                Value::Optional(Some(inner)) => current = inner.to_value(),
                Value::Optional(None) => return None,
                other => return Some(other),
            }
        }
    }

    /// Returns `true` if this is the zero value of its kind.
    ///
    /// Zero values are the empty string, numeric zero, `false`, the Unix epoch,
    /// empty sequences and mappings, null optionals, and records whose exposed
    /// fields are all zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            Value::Number(n) => n.is_zero(),
            Value::Bool(b) => !b,
            Value::Timestamp(t) => *t == DateTime::<Utc>::default(),
            Value::Sequence(s) => s.len() == 0,
            Value::Mapping(m) => m.len() == 0,
            Value::Optional(o) => o.is_none(),
            Value::Record(r) => r.is_zero(),
        }
    }

    /// Returns a short name for the kind of this value.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(n) => n.kind_name(),
            Value::Bool(_) => "bool",
            Value::Timestamp(_) => "timestamp",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Optional(_) => "optional",
            Value::Record(_) => "record",
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Timestamp(t) => f.debug_tuple("Timestamp").field(t).finish(),
            Value::Sequence(s) => {
                let mut list = f.debug_list();
                for i in 0..s.len() {
                    if let Some(item) = s.get(i) {
                        list.entry(&item);
                    }
                }
                list.finish()
            }
            Value::Mapping(m) => {
                let mut map = f.debug_map();
                for (k, v) in m.entries() {
                    map.entry(&k, &v);
                }
                map.finish()
            }
            Value::Optional(None) => f.write_str("Null"),
            Value::Optional(Some(inner)) => f.debug_tuple("Some").field(&inner.to_value()).finish(),
            Value::Record(_) => f.write_str("Record(..)"),
        }
    }
}

/// A numeric value tagged with its exact width.
///
/// Comparison is by mathematical value: integers of any width and signedness
/// are compared exactly. When one side is `f32` the other is narrowed to
/// `f32`; any other float comparison happens in `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Number {
    /// Returns the value as an exact integer, or `None` for floats.
    pub fn as_integer(self) -> Option<i128> {
        match self {
            Number::I8(n) => Some(n.into()),
            Number::I16(n) => Some(n.into()),
            Number::I32(n) => Some(n.into()),
            Number::I64(n) => Some(n.into()),
            Number::U8(n) => Some(n.into()),
            Number::U16(n) => Some(n.into()),
            Number::U32(n) => Some(n.into()),
            Number::U64(n) => Some(n.into()),
            Number::F32(_) | Number::F64(_) => None,
        }
    }

    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I8(n) => n.into(),
            Number::I16(n) => n.into(),
            Number::I32(n) => n.into(),
            Number::I64(n) => n as f64,
            Number::U8(n) => n.into(),
            Number::U16(n) => n.into(),
            Number::U32(n) => n.into(),
            Number::U64(n) => n as f64,
            Number::F32(n) => n.into(),
            Number::F64(n) => n,
        }
    }

    /// Converts the number to f32, rounding to the nearest representable value.
    pub fn to_f32(self) -> f32 {
        match self {
            Number::F32(n) => n,
            other => other.to_f64() as f32,
        }
    }

    /// Returns `true` for floating point widths.
    pub fn is_float(self) -> bool {
        matches!(self, Number::F32(_) | Number::F64(_))
    }

    /// Returns `true` for NaN floats.
    pub fn is_nan(self) -> bool {
        match self {
            Number::F32(n) => n.is_nan(),
            Number::F64(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Returns `true` if the value is zero.
    pub fn is_zero(self) -> bool {
        match self.as_integer() {
            Some(n) => n == 0,
            None => self.to_f64() == 0.0,
        }
    }

    /// Compares two numbers by value.
    ///
    /// Returns `None` only when a NaN is involved.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::F32(a), b) => a.partial_cmp(&b.to_f32()),
            (a, Number::F32(b)) => a.to_f32().partial_cmp(&b),
            _ => match (self.as_integer(), other.as_integer()) {
                (Some(a), Some(b)) => Some(a.cmp(&b)),
                _ => self.to_f64().partial_cmp(&other.to_f64()),
            },
        }
    }

    /// Returns the width name, e.g. `"u16"`.
    pub fn kind_name(self) -> &'static str {
        match self {
            Number::I8(_) => "i8",
            Number::I16(_) => "i16",
            Number::I32(_) => "i32",
            Number::I64(_) => "i64",
            Number::U8(_) => "u8",
            Number::U16(_) => "u16",
            Number::U32(_) => "u32",
            Number::U64(_) => "u64",
            Number::F32(_) => "f32",
            Number::F64(_) => "f64",
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I8(n) => write!(f, "{n}"),
            Number::I16(n) => write!(f, "{n}"),
            Number::I32(n) => write!(f, "{n}"),
            Number::I64(n) => write!(f, "{n}"),
            Number::U8(n) => write!(f, "{n}"),
            Number::U16(n) => write!(f, "{n}"),
            Number::U32(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F32(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! number_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::$variant(n)
                }
            }
        )*
    };
}

number_from! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f32 => F32, f64 => F64,
}

impl From<isize> for Number {
    fn from(n: isize) -> Self {
        Number::I64(n as i64)
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Number::U64(n as u64)
    }
}

/// Declared shape of a field.
///
/// The query compiler uses the kind to turn raw parameter text into a typed
/// operand. Optional and sequence kinds coerce to their element kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    Timestamp,
    Sequence(Box<Kind>),
    Mapping,
    Optional(Box<Kind>),
    Record,
}

impl Kind {
    /// Strips optional and sequence wrappers down to the element kind.
    pub fn element(&self) -> &Kind {
        match self {
            Kind::Sequence(inner) | Kind::Optional(inner) => inner.element(),
            other => other,
        }
    }

    /// Returns `true` for integer widths.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Kind::I8 | Kind::I16 | Kind::I32 | Kind::I64 | Kind::U8 | Kind::U16 | Kind::U32 | Kind::U64
        )
    }

    /// Returns `true` for float widths.
    pub fn is_float(&self) -> bool {
        matches!(self, Kind::F32 | Kind::F64)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::String => f.write_str("string"),
            Kind::I8 => f.write_str("i8"),
            Kind::I16 => f.write_str("i16"),
            Kind::I32 => f.write_str("i32"),
            Kind::I64 => f.write_str("i64"),
            Kind::U8 => f.write_str("u8"),
            Kind::U16 => f.write_str("u16"),
            Kind::U32 => f.write_str("u32"),
            Kind::U64 => f.write_str("u64"),
            Kind::F32 => f.write_str("f32"),
            Kind::F64 => f.write_str("f64"),
            Kind::Bool => f.write_str("bool"),
            Kind::Timestamp => f.write_str("timestamp"),
            Kind::Sequence(inner) => write!(f, "[{inner}]"),
            Kind::Mapping => f.write_str("mapping"),
            Kind::Optional(inner) => write!(f, "optional {inner}"),
            Kind::Record => f.write_str("record"),
        }
    }
}
