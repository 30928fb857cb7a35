//! Error types for the sift crate.

use thiserror::Error;

/// Failure to resolve a field path against a record.
///
/// Operators never surface this; a failed resolution simply does not match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// No field with this name is exposed at this step of the path.
    #[error("no field named '{segment}'")]
    NotFound { segment: String },

    /// An intermediate optional field was null.
    #[error("field '{segment}' is null")]
    NilReference { segment: String },

    /// The path continues past a field that has no fields of its own.
    #[error("field '{segment}' is a {kind}, not a record")]
    NotComposite { segment: String, kind: &'static str },
}

/// Failure to convert raw parameter text into a typed operand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse '{raw}' as {expected}")]
pub struct CoercionError {
    pub raw: String,
    pub expected: String,
}

/// Errors reported while compiling or executing a query from parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The parameter names a field that is not registered as filterable.
    #[error("field '{0}' is not filterable")]
    FieldNotFilterable(String),

    /// The sort parameter names a field that is not registered as sortable.
    #[error("field '{0}' is not sortable")]
    FieldNotSortable(String),

    /// A parameter value could not be coerced to the field's kind.
    #[error("invalid value '{value}' for '{field}': expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    /// The requested page size is above the configured maximum.
    #[error("limit {requested} exceeds maximum of {max}")]
    LimitExceeded { requested: usize, max: usize },
}

/// Result type for query compilation and execution.
pub type Result<T> = std::result::Result<T, QueryError>;
