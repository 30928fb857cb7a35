//! Entry points that run predicates and parameter queries over slices.

use crate::compiler::compile;
use crate::error::Result;
use crate::options::QueryOptions;
use crate::page::PageResult;
use crate::params::Params;
use crate::predicate::Predicate;
use crate::record::Record;

/// Returns the items matching `predicate`, in input order.
pub fn apply<'a, T: Record>(items: &'a [T], predicate: &Predicate<T>) -> Vec<&'a T> {
    predicate.filter(items)
}

/// Compiles `params` for `T`, then filters and sorts `items` without paging.
pub fn apply_query<'a, T: Record + 'static>(
    items: &'a [T],
    params: &Params,
    options: &QueryOptions,
) -> Result<Vec<&'a T>> {
    Ok(compile::<T>(params, options)?.apply(items))
}

/// Compiles `params` for `T`, then filters, sorts and pages `items`.
///
/// ```
/// use sift::{apply_paginated, Params, QueryOptions, Record};
///
/// #[derive(Record)]
/// struct Book {
///     #[query(filterable, sortable)]
///     title: String,
///     #[query(filterable, sortable)]
///     year: u16,
/// }
///
/// let books = vec![
///     Book { title: "Dune".into(), year: 1965 },
///     Book { title: "Neuromancer".into(), year: 1984 },
///     Book { title: "Hyperion".into(), year: 1989 },
/// ];
///
/// let params: Params = [("year_gte", "1980"), ("sort", "-year"), ("limit", "1")]
///     .into_iter()
///     .collect();
/// let page = apply_paginated(&books, &params, &QueryOptions::default()).unwrap();
/// assert_eq!(page.total, 2);
/// assert_eq!(page.items[0].title, "Hyperion");
/// assert!(page.has_next);
/// ```
pub fn apply_paginated<'a, T: Record + 'static>(
    items: &'a [T],
    params: &Params,
    options: &QueryOptions,
) -> Result<PageResult<&'a T>> {
    Ok(compile::<T>(params, options)?.execute(items))
}
