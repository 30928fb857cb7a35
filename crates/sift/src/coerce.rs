//! Conversion of raw parameter text into typed operands.

use std::str::FromStr;

use crate::date;
use crate::error::CoercionError;
use crate::operand::Operand;
use crate::value::{Kind, Number};

/// Parses `raw` as a value of `kind`.
///
/// Optional and sequence kinds parse as their element kind. Integers are
/// base 10 and must fit the declared width. Booleans accept `1`, `t`, `T`,
/// `true`, `TRUE`, `True` and the matching false forms. Timestamps accept
/// RFC 3339 or `YYYY-MM-DD`.
///
/// ```
/// use sift::{coerce, Kind, Number, Operand};
///
/// assert_eq!(coerce("42", &Kind::U8), Ok(Operand::Number(Number::U8(42))));
/// assert!(coerce("300", &Kind::U8).is_err());
/// ```
pub fn coerce(raw: &str, kind: &Kind) -> Result<Operand, CoercionError> {
    let fail = || CoercionError {
        raw: raw.to_string(),
        expected: kind.element().to_string(),
    };

    let operand = match kind.element() {
        Kind::String => Operand::String(raw.to_string()),
        Kind::I8 => number::<i8>(raw).ok_or_else(fail)?,
        Kind::I16 => number::<i16>(raw).ok_or_else(fail)?,
        Kind::I32 => number::<i32>(raw).ok_or_else(fail)?,
        Kind::I64 => number::<i64>(raw).ok_or_else(fail)?,
        Kind::U8 => number::<u8>(raw).ok_or_else(fail)?,
        Kind::U16 => number::<u16>(raw).ok_or_else(fail)?,
        Kind::U32 => number::<u32>(raw).ok_or_else(fail)?,
        Kind::U64 => number::<u64>(raw).ok_or_else(fail)?,
        Kind::F32 => number::<f32>(raw).ok_or_else(fail)?,
        Kind::F64 => number::<f64>(raw).ok_or_else(fail)?,
        Kind::Bool => Operand::Bool(parse_bool(raw).ok_or_else(fail)?),
        Kind::Timestamp => Operand::Timestamp(date::parse_timestamp(raw).ok_or_else(fail)?),
        Kind::Mapping | Kind::Record | Kind::Sequence(_) | Kind::Optional(_) => return Err(fail()),
    };
    Ok(operand)
}

fn number<N>(raw: &str) -> Option<Operand>
where
    N: FromStr + Into<Number>,
{
    raw.parse::<N>().ok().map(|n| Operand::Number(n.into()))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
