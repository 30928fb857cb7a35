//! Compilation of query parameters into typed filters, ordering and paging.
//!
//! Parameter keys name a registered column with an optional operator suffix:
//!
//! ```text
//! age=30            age equals 30
//! age_gte=18        age >= 18
//! status_in=a,b     status is "a" or "b"
//! price_between=1,9 1 <= price <= 9
//! sort=-created_at  newest first
//! page=2&limit=10   second page of ten
//! ```
//!
//! Values are coerced to the registered kind of the field. Everything is
//! checked up front, so a compiled query cannot fail when executed.

use std::marker::PhantomData;

use crate::clause::Clause;
use crate::coerce::coerce;
use crate::condition::Condition;
use crate::error::{QueryError, Result};
use crate::op::Op;
use crate::operand::Operand;
use crate::options::QueryOptions;
use crate::ordering::{self, OrderBy};
use crate::page::{paginate, PageResult};
use crate::params::Params;
use crate::path::FieldPath;
use crate::predicate::Predicate;
use crate::record::Record;
use crate::registry::{FieldDescriptor, FieldRegistry};

/// Parameter holding the sort field, `-` prefixed for descending.
pub const SORT_PARAM: &str = "sort";
/// Parameter holding the 1-based page number.
pub const PAGE_PARAM: &str = "page";
/// Parameter holding the page size.
pub const LIMIT_PARAM: &str = "limit";

/// Typed operand of a compiled filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Single(Operand),
    List(Vec<Operand>),
    Range(Operand, Operand),
}

/// One compiled filter: a field, an operator and a typed operand.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub field: FieldPath,
    pub op: Op,
    pub value: FilterValue,
}

impl FilterSpec {
    /// Builds the equivalent predicate.
    pub fn to_predicate<T>(&self) -> Predicate<T> {
        let path = self.field.clone();
        match (&self.value, self.op) {
            (FilterValue::Range(min, max), _) => Predicate::between(path, min.clone(), max.clone()),
            (FilterValue::List(values), _) => Predicate::is_in(path, values.iter().cloned()),
            (FilterValue::Single(value), Op::Contains) => Predicate::contains(path, value.clone()),
            (FilterValue::Single(value), op) => {
                Predicate::Field(Clause::new(path, Condition::Compare(op, value.clone())))
            }
        }
    }
}

/// A query compiled against the registry of `T`.
pub struct CompiledQuery<T> {
    filters: Vec<FilterSpec>,
    sort: Option<OrderBy>,
    page: usize,
    limit: usize,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for CompiledQuery<T> {
    fn clone(&self) -> Self {
        CompiledQuery {
            filters: self.filters.clone(),
            sort: self.sort.clone(),
            page: self.page,
            limit: self.limit,
            _record: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for CompiledQuery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledQuery")
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("page", &self.page)
            .field("limit", &self.limit)
            .finish()
    }
}

impl<T> CompiledQuery<T> {
    /// Filters in parameter-key order.
    pub fn filters(&self) -> &[FilterSpec] {
        &self.filters
    }

    /// Requested ordering, or the configured default.
    pub fn sort(&self) -> Option<&OrderBy> {
        self.sort.as_ref()
    }

    /// 1-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The conjunction of all filters. With no filters it matches everything.
    pub fn predicate(&self) -> Predicate<T> {
        Predicate::And(self.filters.iter().map(FilterSpec::to_predicate).collect())
    }
}

impl<T: Record> CompiledQuery<T> {
    /// Filters and sorts `items` without paging.
    pub fn apply<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        let matched = self.predicate().filter(items);
        match &self.sort {
            Some(order) => ordering::sort(matched, order),
            None => matched,
        }
    }

    /// Filters, sorts and returns the requested page.
    pub fn execute<'a>(&self, items: &'a [T]) -> PageResult<&'a T> {
        let result = paginate(self.apply(items), self.page, self.limit);
        tracing::debug!(
            scanned = items.len(),
            matched = result.total,
            returned = result.items.len(),
            page = result.page,
            "executed query"
        );
        result
    }
}

/// Compiles `params` into a query over `T`.
///
/// Reserved keys `sort`, `page` and `limit` control ordering and paging;
/// every other key must name a filterable column of `T`.
pub fn compile<T: Record + 'static>(params: &Params, options: &QueryOptions) -> Result<CompiledQuery<T>> {
    let registry = FieldRegistry::of::<T>();
    compile_with(&registry, params, options)
}

/// Compiles `params` against an explicit registry.
pub fn compile_with<T>(
    registry: &FieldRegistry,
    params: &Params,
    options: &QueryOptions,
) -> Result<CompiledQuery<T>> {
    let mut query = CompiledQuery {
        filters: Vec::new(),
        sort: None,
        page: 1,
        limit: options.default_limit,
        _record: PhantomData,
    };

    for (key, raw) in params.first_values() {
        match key {
            SORT_PARAM => query.sort = Some(parse_sort(registry, raw)?),
            PAGE_PARAM => query.page = positive(PAGE_PARAM, raw)?,
            LIMIT_PARAM => {
                let limit = positive(LIMIT_PARAM, raw)?;
                if let Some(max) = options.max_limit {
                    if limit > max {
                        return Err(QueryError::LimitExceeded {
                            requested: limit,
                            max,
                        });
                    }
                }
                query.limit = limit;
            }
            _ => query.filters.push(parse_filter(registry, key, raw)?),
        }
    }

    if query.sort.is_none() {
        query.sort = options.default_sort.clone();
    }

    tracing::debug!(
        record = registry.type_name(),
        filters = query.filters.len(),
        sort = ?query.sort,
        page = query.page,
        limit = query.limit,
        "compiled query"
    );
    Ok(query)
}

fn positive(name: &str, raw: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(QueryError::InvalidValue {
            field: name.to_string(),
            value: raw.to_string(),
            expected: "positive integer".to_string(),
        }),
    }
}

fn parse_sort(registry: &FieldRegistry, raw: &str) -> Result<OrderBy> {
    let requested = OrderBy::parse(raw);
    let column = requested.field.to_string();
    let field = registry
        .sortable(&column)
        .ok_or(QueryError::FieldNotSortable(column))?;
    Ok(OrderBy::new(field.path.clone(), requested.dir))
}

fn parse_filter(registry: &FieldRegistry, key: &str, raw: &str) -> Result<FilterSpec> {
    let (column, op) = Op::split_key(key);
    let field = registry
        .filterable(column)
        .ok_or_else(|| QueryError::FieldNotFilterable(column.to_string()))?;

    let value = match op {
        Op::In => FilterValue::List(
            raw.split(',')
                .map(|part| typed(field, column, raw, part.trim()))
                .collect::<Result<_>>()?,
        ),
        Op::Between => {
            let Some((min, max)) = raw.split_once(',') else {
                return Err(invalid(field, column, raw));
            };
            FilterValue::Range(
                typed(field, column, raw, min.trim())?,
                typed(field, column, raw, max.trim())?,
            )
        }
        _ => FilterValue::Single(typed(field, column, raw, raw)?),
    };

    Ok(FilterSpec {
        field: field.path.clone(),
        op,
        value,
    })
}

fn typed(field: &FieldDescriptor, column: &str, raw: &str, part: &str) -> Result<Operand> {
    coerce(part, &field.kind).map_err(|_| invalid(field, column, raw))
}

fn invalid(field: &FieldDescriptor, column: &str, raw: &str) -> QueryError {
    QueryError::InvalidValue {
        field: column.to_string(),
        value: raw.to_string(),
        expected: field.kind.element().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Kind, Number};

    struct Item;

    fn registry() -> FieldRegistry {
        FieldRegistry::from_descriptors(
            "Item",
            vec![
                FieldDescriptor::new("name", Kind::String).filterable().sortable(),
                FieldDescriptor::new("age", Kind::U8).filterable().sortable(),
                FieldDescriptor::new("score", Kind::F64).filterable(),
                FieldDescriptor::new("address.city", Kind::String)
                    .column("city")
                    .filterable(),
                FieldDescriptor::new("rank", Kind::U32).sortable(),
            ],
        )
    }

    fn compile_params(pairs: &[(&str, &str)]) -> Result<CompiledQuery<Item>> {
        let params: Params = pairs.iter().copied().collect();
        compile_with(&registry(), &params, &QueryOptions::default())
    }

    #[test]
    fn empty_params_use_defaults() {
        let query = compile_params(&[]).unwrap();
        assert!(query.filters().is_empty());
        assert_eq!(query.sort(), None);
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 20);
    }

    #[test]
    fn operators_from_suffixes() {
        let query = compile_params(&[("age_gte", "18"), ("name", "Ana"), ("score_lt", "9.5")]).unwrap();
        let filters = query.filters();
        assert_eq!(filters.len(), 3);
        assert_eq!(
            filters[0],
            FilterSpec {
                field: "age".into(),
                op: Op::Gte,
                value: FilterValue::Single(Operand::Number(Number::U8(18))),
            }
        );
        assert_eq!(filters[1].op, Op::Eq);
        assert_eq!(filters[2].value, FilterValue::Single(Operand::Number(Number::F64(9.5))));
    }

    #[test]
    fn in_splits_and_trims() {
        let query = compile_params(&[("name_in", "a, b ,c")]).unwrap();
        assert_eq!(
            query.filters()[0].value,
            FilterValue::List(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn between_needs_two_parts() {
        let query = compile_params(&[("age_between", "18, 30")]).unwrap();
        assert_eq!(
            query.filters()[0].value,
            FilterValue::Range(Number::U8(18).into(), Number::U8(30).into())
        );

        let err = compile_params(&[("age_between", "18")]).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidValue {
                field: "age".into(),
                value: "18".into(),
                expected: "u8".into()
            }
        );
    }

    #[test]
    fn column_override_maps_to_path() {
        let query = compile_params(&[("city", "Lisbon")]).unwrap();
        assert_eq!(query.filters()[0].field, FieldPath::parse("address.city"));
    }

    #[test]
    fn unknown_or_sort_only_field_is_not_filterable() {
        assert_eq!(
            compile_params(&[("salary_gt", "1")]).unwrap_err(),
            QueryError::FieldNotFilterable("salary".into())
        );
        assert_eq!(
            compile_params(&[("rank", "1")]).unwrap_err(),
            QueryError::FieldNotFilterable("rank".into())
        );
    }

    #[test]
    fn invalid_value_names_field_and_kind() {
        let err = compile_params(&[("age", "old")]).unwrap_err();
        assert_eq!(err.to_string(), "invalid value 'old' for 'age': expected u8");
    }

    #[test]
    fn sort_parsing() {
        let query = compile_params(&[("sort", "-rank")]).unwrap();
        assert_eq!(query.sort(), Some(&OrderBy::desc("rank")));

        assert_eq!(
            compile_params(&[("sort", "score")]).unwrap_err(),
            QueryError::FieldNotSortable("score".into())
        );
        assert_eq!(
            compile_params(&[("sort", "-nope")]).unwrap_err(),
            QueryError::FieldNotSortable("nope".into())
        );
    }

    #[test]
    fn page_and_limit_must_be_positive() {
        for (key, raw) in [("page", "0"), ("page", "-1"), ("limit", "x"), ("limit", "0")] {
            let err = compile_params(&[(key, raw)]).unwrap_err();
            assert_eq!(
                err,
                QueryError::InvalidValue {
                    field: key.into(),
                    value: raw.into(),
                    expected: "positive integer".into()
                }
            );
        }
    }

    #[test]
    fn limit_above_max() {
        let params: Params = [("limit", "500")].into_iter().collect();
        let options = QueryOptions::default().with_max_limit(100);
        assert_eq!(
            compile_with::<Item>(&registry(), &params, &options).unwrap_err(),
            QueryError::LimitExceeded {
                requested: 500,
                max: 100
            }
        );
    }

    #[test]
    fn default_sort_applies_when_absent() {
        let options = QueryOptions::default().with_default_sort(OrderBy::asc("name"));
        let query = compile_with::<Item>(&registry(), &Params::new(), &options).unwrap();
        assert_eq!(query.sort(), Some(&OrderBy::asc("name")));

        let params: Params = [("sort", "-age")].into_iter().collect();
        let query = compile_with::<Item>(&registry(), &params, &options).unwrap();
        assert_eq!(query.sort(), Some(&OrderBy::desc("age")));
    }

    #[test]
    fn only_first_value_is_used() {
        let params = Params::new().with("age", "1").with("age", "nonsense");
        let query = compile_with::<Item>(&registry(), &params, &QueryOptions::default()).unwrap();
        assert_eq!(query.filters().len(), 1);
    }
}
