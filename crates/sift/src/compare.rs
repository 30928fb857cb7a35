//! Value comparison shared by all operators and by sorting.
//!
//! Both functions return `None` when the two values cannot be compared. Every
//! operator treats that as "no match", so a type mismatch never panics and
//! never errors.

use std::cmp::Ordering;

use crate::date;
use crate::value::Value;

/// Compares two values for equality.
///
/// Optionals are dereferenced first. Two nulls are equal; a null against a
/// present value is incomparable. Sequences are equal when they have the same
/// length and pairwise equal elements, mappings when every entry of one is
/// found with an equal value in the other.
pub fn equals(a: &Value<'_>, b: &Value<'_>) -> Option<bool> {
    let (a, b) = match (a.dereference(), b.dereference()) {
        (Some(a), Some(b)) => (a, b),
        (None, None) => return Some(true),
        _ => return None,
    };

    match (a, b) {
        (Value::Sequence(x), Value::Sequence(y)) => {
            if x.len() != y.len() {
                return Some(false);
            }
            for (left, right) in x.iter().zip(y.iter()) {
                if !equals(&left, &right)? {
                    return Some(false);
                }
            }
            Some(true)
        }
        (Value::Mapping(x), Value::Mapping(y)) => {
            if x.len() != y.len() {
                return Some(false);
            }
            for (key, left) in x.entries() {
                match y.lookup(&key) {
                    Some(right) => {
                        if !equals(&left, &right)? {
                            return Some(false);
                        }
                    }
                    None => return Some(false),
                }
            }
            Some(true)
        }
        (a, b) => compare(&a, &b).map(|ordering| ordering == Ordering::Equal),
    }
}

/// Compares two values for ordering.
///
/// Strings order lexicographically by byte, numbers by value across widths,
/// `false` before `true`, timestamps chronologically. A string compared with a
/// timestamp is parsed as a date first. Sequences, mappings and records have
/// no ordering.
pub fn compare(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    let a = a.dereference()?;
    let b = b.dereference()?;

    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::Number(y)) => x.compare(y),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(&y)),
        (Value::Timestamp(x), Value::Timestamp(y)) => Some(x.cmp(&y)),
        (Value::Timestamp(x), Value::String(y)) => date::parse_date(y).map(|y| x.cmp(&y)),
        (Value::String(x), Value::Timestamp(y)) => date::parse_date(x).map(|x| x.cmp(&y)),
        _ => None,
    }
}
