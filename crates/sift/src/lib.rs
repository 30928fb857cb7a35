//! Sift - predicate engine and query compiler for in-memory struct collections.
//!
//! Sift filters, sorts and pages slices of plain Rust structs. It offers two
//! ways in:
//!
//! - **Predicates**: build a [`Predicate`] in code from field operators,
//!   string, date, sequence, mapping and geographic tests, boolean
//!   combinators, or arbitrary closures.
//! - **Query parameters**: compile URL-style [`Params`] such as
//!   `age_gte=18&sort=-name&page=2` against the fields a type declares with
//!   `#[query(...)]`, with values coerced to each field's type.
//!
//! # Quick Start
//!
//! ```rust
//! use sift::{apply_paginated, Params, Predicate, QueryOptions, Record};
//!
//! #[derive(Record, Clone)]
//! struct User {
//!     #[query(filterable, sortable)]
//!     name: String,
//!     #[query(filterable, sortable)]
//!     age: u32,
//!     #[query(filterable, column = "town")]
//!     city: String,
//! }
//!
//! let users = vec![
//!     User { name: "Alice".into(), age: 30, city: "Lisbon".into() },
//!     User { name: "Bob".into(), age: 17, city: "Porto".into() },
//!     User { name: "Carol".into(), age: 42, city: "Lisbon".into() },
//! ];
//!
//! // In code
//! let adults_in_lisbon = Predicate::and(vec![
//!     Predicate::gte(User::AGE, 18u32),
//!     Predicate::eq(User::CITY, "Lisbon"),
//! ]);
//! assert_eq!(adults_in_lisbon.count(&users), 2);
//!
//! // From request parameters
//! let params: Params = [("town", "Lisbon"), ("sort", "-age")].into_iter().collect();
//! let page = apply_paginated(&users, &params, &QueryOptions::default()).unwrap();
//! assert_eq!(page.total, 2);
//! assert_eq!(page.items[0].name, "Carol");
//! ```
//!
//! # Evaluation Semantics
//!
//! Predicates never fail. A field that does not exist, a null in the middle
//! of a path, or an operand of the wrong type all evaluate to `false`.
//! Numbers compare by value across widths, so a `u8` field equals an `i64`
//! operand of the same value.
//!
//! # Query Parameters
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `field=v` | equals |
//! | `field_ne=v` | not equal |
//! | `field_gt=v`, `_gte`, `_lt`, `_lte` | ordering |
//! | `field_in=a,b,c` | one of |
//! | `field_contains=v` | substring or element |
//! | `field_between=lo,hi` | inclusive range |
//! | `sort=field`, `sort=-field` | ascending / descending |
//! | `page=n`, `limit=n` | 1-based paging |

mod clause;
mod coerce;
mod compare;
mod compiler;
mod condition;
mod date;
mod error;
mod exec;
mod geo;
mod op;
mod operand;
mod options;
mod ordering;
mod page;
mod params;
mod path;
mod predicate;
mod record;
mod registry;
mod value;

// Re-export public API
pub use clause::Clause;
pub use coerce::coerce;
pub use compare::{compare, equals};
pub use compiler::{
    compile, compile_with, CompiledQuery, FilterSpec, FilterValue, LIMIT_PARAM, PAGE_PARAM,
    SORT_PARAM,
};
pub use condition::{Condition, ElementTest, MatchMode, MatchOptions};
pub use date::{parse_date, parse_timestamp};
pub use error::{CoercionError, FieldError, QueryError, Result};
pub use exec::{apply, apply_paginated, apply_query};
pub use geo::{
    haversine_km, sort_by_distance, Area, BoundingBox, Coordinates, GeoClause, Point,
    EARTH_RADIUS_KM,
};
pub use op::Op;
pub use operand::Operand;
pub use options::{QueryOptions, DEFAULT_LIMIT};
pub use ordering::{sort, Dir, OrderBy};
pub use page::{paginate, PageResult};
pub use params::Params;
pub use path::{resolve, FieldPath};
pub use predicate::Predicate;
pub use record::{FieldKind, FieldValue, Mapping, Record, Sequence};
pub use registry::{to_snake_case, FieldDescriptor, FieldRegistry};
pub use value::{Kind, Number, Value};

#[cfg(feature = "derive")]
pub use sift_macros::Record;
