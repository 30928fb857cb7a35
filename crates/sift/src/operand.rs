//! Owned comparison operands.

use chrono::{DateTime, Utc};

use crate::record::FieldValue;
use crate::value::{Number, Value};

/// A value held by a predicate and compared against record fields.
///
/// Operands are owned so predicates can outlive the data they were built
/// from. They present themselves to the comparator as ordinary [`Value`]s.
///
/// # Example
///
/// ```
/// use sift::Operand;
///
/// let name: Operand = "Alice".into();
/// let age: Operand = 30u8.into();
/// let tags: Operand = vec!["red", "blue"].into();
/// let missing: Operand = Option::<i32>::None.into();
/// assert_eq!(missing, Operand::Null);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    String(String),
    Number(Number),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    List(Vec<Operand>),
    /// Compares equal only to a null optional.
    Null,
}

impl Operand {
    /// Extracts the string, if this is a string operand.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Operand::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FieldValue for Operand {
    fn to_value(&self) -> Value<'_> {
        match self {
            Operand::String(s) => Value::String(s),
            Operand::Number(n) => Value::Number(*n),
            Operand::Bool(b) => Value::Bool(*b),
            Operand::Timestamp(t) => Value::Timestamp(*t),
            Operand::List(items) => Value::Sequence(items),
            Operand::Null => Value::Optional(None),
        }
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::String(s)
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::String(s.to_string())
    }
}

impl From<&String> for Operand {
    fn from(s: &String) -> Self {
        Operand::String(s.clone())
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::Bool(b)
    }
}

impl From<DateTime<Utc>> for Operand {
    fn from(t: DateTime<Utc>) -> Self {
        Operand::Timestamp(t)
    }
}

impl From<Number> for Operand {
    fn from(n: Number) -> Self {
        Operand::Number(n)
    }
}

macro_rules! operand_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Operand {
                fn from(n: $ty) -> Self {
                    Operand::Number(Number::from(n))
                }
            }
        )*
    };
}

operand_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Into<Operand>> From<Vec<T>> for Operand {
    fn from(items: Vec<T>) -> Self {
        Operand::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Operand>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        value.map_or(Operand::Null, Into::into)
    }
}
