//! Proc macros for Sift.
//!
//! # Derive Macros
//!
//! - [`Record`] - Expose struct fields to the predicate engine and query compiler

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `sift::Record` for structs with named fields.
///
/// Every field is readable by predicates under its own name unless it is
/// marked `#[query(skip)]`. Field types must implement `sift::FieldValue`;
/// registered fields must also implement `sift::FieldKind`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `filterable` | Field may appear in query parameter filters |
/// | `sortable` | Field may be used as the `sort` parameter |
/// | `column = "..."` | External parameter name (default: snake_case field name) |
/// | `skip` | Hide the field from the engine |
///
/// # Generated Code
///
/// 1. Field path constants (e.g., `Task::NAME`, `Task::PRIORITY`)
/// 2. `Record`, with `field()`, `descriptors()` and `is_zero()`
/// 3. `FieldValue` and `FieldKind`, so the struct can nest inside other records
///
/// # Example
///
/// ```ignore
/// use sift::{Predicate, Record};
///
/// #[derive(Record)]
/// struct Address {
///     #[query(filterable)]
///     city: String,
/// }
///
/// #[derive(Record)]
/// struct Task {
///     #[query(filterable, sortable)]
///     name: String,
///
///     #[query(filterable, sortable, column = "prio")]
///     priority: u8,
///
///     address: Address,
///
///     #[query(skip)]
///     internal_id: u64,
/// }
///
/// let in_lisbon = Predicate::<Task>::eq("address.city", "Lisbon");
/// ```
///
/// # Compile-Time Errors
///
/// - Enums, unions and tuple structs
/// - Unknown `#[query(...)]` options
/// - `skip` combined with any other option
#[proc_macro_derive(Record, attributes(query))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
